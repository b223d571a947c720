//! Post-processors: fallible `File -> File` transforms run on every produced file.

use crate::Result;
use crate::error::GenError;
use crate::types::File;

/// A post-processor. Registered post-processors run in registration order.
pub type FileMapper = Box<dyn Fn(File) -> Result<File>>;

/// Run `file` through `post` in order. The first failure drops the file and is reported
/// with its path and provenance stack.
pub fn apply_postprocessors(post: &[FileMapper], file: File) -> std::result::Result<File, GenError> {
    let path = file.relative_path.clone();
    let stack = file.stack().to_string();
    post.iter()
        .try_fold(file, |f, mapper| mapper(f))
        .map_err(|source| GenError::Postprocess {
            path,
            stack,
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postprocessors_run_in_order() {
        let post: Vec<FileMapper> = vec![
            Box::new(|mut f: File| -> Result<File> {
                f.data.extend_from_slice(b"-A");
                Ok(f)
            }),
            Box::new(|mut f: File| -> Result<File> {
                f.data.extend_from_slice(b"-B");
                Ok(f)
            }),
        ];
        let out = apply_postprocessors(&post, File::new("x", "body")).unwrap();
        assert_eq!(out.data, b"body-A-B");
    }

    #[test]
    fn test_failure_names_path_and_stack() {
        let post: Vec<FileMapper> = vec![Box::new(|_: File| -> Result<File> {
            anyhow::bail!("bad header")
        })];
        let err = apply_postprocessors(&post, File::new("x.go", "").from_generator("gen"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "postprocessing of x.go from gen failed: bad header"
        );
    }
}
