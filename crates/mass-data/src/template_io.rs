//! Reading templates and writing generated output.
//!
//! Templates are opened like any other file, so symbolic links are followed.
//! Output goes through a capability-based handle on the directory that will
//! hold the file; an output path that is a symbolic link is resolved first so
//! the link's target receives the data and the link itself survives.

use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{
    ambient_authority,
    fs::{Dir, File},
};

use crate::atomic_io::write_atomic;
use crate::error::TemplateIoError;
use crate::report::ErrorReporter;
use crate::template::Template;

const SYMLINK_HOPS: usize = 40;

/// Reads the whole template file as UTF-8 text.
///
/// # Errors
///
/// Returns [`TemplateIoError::InputNotFound`] if the file or its directory
/// does not exist, and [`TemplateIoError::Read`] for any other failure.
pub fn read_template(path: &Utf8Path) -> Result<Template, TemplateIoError> {
    let mut file =
        File::open_ambient(path, ambient_authority()).map_err(|err| input_error(path, &err))?;
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(|err| input_error(path, &err))?;
    Ok(Template::new(text))
}

/// Writes `contents` to `path`, replacing any existing file atomically.
///
/// When `path` is a symbolic link, the file it points to is replaced and the
/// link is left in place.
///
/// # Errors
///
/// Returns [`TemplateIoError::OutputWrite`] if the directory cannot be opened
/// or the file cannot be written.
pub fn write_output(
    path: &Utf8Path,
    contents: &str,
    reporter: &dyn ErrorReporter,
) -> Result<(), TemplateIoError> {
    let target = resolve_output(path)?;
    let Some((parent, file_name)) = split_path(&target) else {
        return Err(TemplateIoError::OutputWrite {
            path: path.to_path_buf(),
            message: "output path must name a file".to_owned(),
        });
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| output_error(path, &err))?;
    write_atomic(&dir, file_name, contents.as_bytes(), reporter)
        .map_err(|err| output_error(path, &err))
}

/// Follows symbolic links from `path` to the file that should receive output.
///
/// Dangling links resolve to their missing target, which is then created.
fn resolve_output(path: &Utf8Path) -> Result<Utf8PathBuf, TemplateIoError> {
    let mut target = path.to_path_buf();
    for _ in 0..SYMLINK_HOPS {
        if !target.is_symlink() {
            return Ok(target);
        }
        let link = target.read_link_utf8().map_err(|err| output_error(path, &err))?;
        target = match target.parent() {
            Some(parent) if link.is_relative() => parent.join(link),
            _ => link,
        };
    }
    Err(TemplateIoError::OutputWrite {
        path: path.to_path_buf(),
        message: "too many levels of symbolic links".to_owned(),
    })
}

/// Splits `path` into the directory to open and the file name inside it.
fn split_path(path: &Utf8Path) -> Option<(&Utf8Path, &str)> {
    let file_name = path.file_name()?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Some((parent, file_name))
}

fn input_error(path: &Utf8Path, err: &io::Error) -> TemplateIoError {
    if err.kind() == io::ErrorKind::NotFound {
        TemplateIoError::InputNotFound {
            path: path.to_path_buf(),
        }
    } else {
        TemplateIoError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

fn output_error(path: &Utf8Path, err: &io::Error) -> TemplateIoError {
    TemplateIoError::OutputWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    //! Covers template reads, atomic output writes, and error mapping.

    use std::cell::RefCell;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};

    use super::*;

    #[derive(Default)]
    struct RecordingReporter {
        messages: RefCell<Vec<String>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report_error(&self, error: &dyn Error) {
            self.messages.borrow_mut().push(error.to_string());
        }
    }

    struct ScratchDir {
        path: Utf8PathBuf,
    }

    impl ScratchDir {
        fn file(&self, name: &str) -> Utf8PathBuf {
            self.path.join(name)
        }

        fn handle(&self) -> Dir {
            Dir::open_ambient_dir(&self.path, ambient_authority()).expect("open scratch dir")
        }

        fn entries(&self) -> Vec<String> {
            let mut names: Vec<String> = self
                .handle()
                .entries()
                .expect("list scratch dir")
                .map(|entry| {
                    entry
                        .expect("dir entry")
                        .file_name()
                        .into_string()
                        .expect("utf-8 file name")
                })
                .collect();
            names.sort();
            names
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let root = Dir::open_ambient_dir(".", ambient_authority()).expect("open workspace dir");
            drop(root.remove_dir_all(&self.path));
        }
    }

    #[fixture]
    fn scratch() -> ScratchDir {
        static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let process_id = std::process::id();
        let path = Utf8PathBuf::from("target")
            .join("mass-data-tests")
            .join(format!("template-io-{process_id}-{counter}"));
        let root = Dir::open_ambient_dir(".", ambient_authority()).expect("open workspace dir");
        root.create_dir_all(&path).expect("create scratch dir");
        ScratchDir { path }
    }

    #[rstest]
    fn reads_template_text(scratch: ScratchDir) {
        scratch
            .handle()
            .write("template.txt", "id=#SEQ#")
            .expect("write template");

        let template = read_template(&scratch.file("template.txt")).expect("read template");

        assert_eq!(template.as_str(), "id=#SEQ#");
    }

    #[cfg(unix)]
    #[rstest]
    #[case::absolute_target(true)]
    #[case::relative_target(false)]
    fn reads_template_through_symlink(scratch: ScratchDir, #[case] absolute: bool) {
        let dir = scratch.handle();
        dir.create_dir("shared").expect("create shared dir");
        dir.create_dir("links").expect("create links dir");
        dir.write("shared/real.txt", "#SEQ#").expect("write template");
        let original = if absolute {
            scratch
                .file("shared/real.txt")
                .canonicalize_utf8()
                .expect("absolute template path")
        } else {
            Utf8PathBuf::from("../shared/real.txt")
        };
        let link = scratch.file("links/link.txt");
        std::os::unix::fs::symlink(&original, &link).expect("create symlink");

        let template = read_template(&link).expect("read through symlink");

        assert_eq!(template.as_str(), "#SEQ#");
    }

    #[rstest]
    fn missing_template_is_reported_as_not_found(scratch: ScratchDir) {
        let path = scratch.file("absent.txt");

        let err = read_template(&path).expect_err("missing file");

        assert_eq!(err, TemplateIoError::InputNotFound { path });
    }

    #[rstest]
    fn missing_template_directory_is_reported_as_not_found(scratch: ScratchDir) {
        let path = scratch.file("no-such-dir").join("template.txt");

        let err = read_template(&path).expect_err("missing directory");

        assert_eq!(err, TemplateIoError::InputNotFound { path });
    }

    #[rstest]
    fn non_utf8_template_is_a_read_error(scratch: ScratchDir) {
        scratch
            .handle()
            .write("binary.txt", [0xff_u8, 0xfe, 0x00])
            .expect("write template");
        let path = scratch.file("binary.txt");

        let err = read_template(&path).expect_err("invalid utf-8");

        assert!(matches!(err, TemplateIoError::Read { path: err_path, .. } if err_path == path));
    }

    #[rstest]
    fn writes_output_and_leaves_no_temp_files(scratch: ScratchDir) {
        let reporter = RecordingReporter::default();
        let path = scratch.file("out.txt");

        write_output(&path, "a\r\nb\r\n", &reporter).expect("write output");

        let written = scratch.handle().read("out.txt").expect("read output");
        assert_eq!(written, b"a\r\nb\r\n");
        assert_eq!(scratch.entries(), vec!["out.txt".to_owned()]);
        assert!(reporter.messages.borrow().is_empty());
    }

    #[rstest]
    fn overwrites_existing_output(scratch: ScratchDir) {
        let reporter = RecordingReporter::default();
        scratch
            .handle()
            .write("out.txt", "stale contents that are longer")
            .expect("seed output");
        let path = scratch.file("out.txt");

        write_output(&path, "fresh", &reporter).expect("write output");

        let written = scratch.handle().read_to_string("out.txt").expect("read output");
        assert_eq!(written, "fresh");
    }

    #[cfg(unix)]
    #[rstest]
    fn symlinked_output_replaces_link_target(scratch: ScratchDir) {
        let reporter = RecordingReporter::default();
        let dir = scratch.handle();
        dir.create_dir("shared").expect("create shared dir");
        dir.write("shared/real.txt", "stale").expect("seed target");
        let link = scratch.file("out.txt");
        std::os::unix::fs::symlink("shared/real.txt", &link).expect("create symlink");

        write_output(&link, "fresh", &reporter).expect("write through symlink");

        let written = dir.read_to_string("shared/real.txt").expect("read target");
        assert_eq!(written, "fresh");
        let link_metadata = dir.symlink_metadata("out.txt").expect("link metadata");
        assert!(link_metadata.file_type().is_symlink());
        assert_eq!(scratch.entries(), vec!["out.txt".to_owned(), "shared".to_owned()]);
    }

    #[cfg(unix)]
    #[rstest]
    fn dangling_output_symlink_creates_target(scratch: ScratchDir) {
        let reporter = RecordingReporter::default();
        let link = scratch.file("out.txt");
        std::os::unix::fs::symlink("created.txt", &link).expect("create symlink");

        write_output(&link, "data", &reporter).expect("write through dangling symlink");

        let written = scratch.handle().read_to_string("created.txt").expect("read target");
        assert_eq!(written, "data");
    }

    #[rstest]
    fn missing_output_directory_is_a_write_error(scratch: ScratchDir) {
        let reporter = RecordingReporter::default();
        let path = scratch.file("no-such-dir").join("out.txt");

        let err = write_output(&path, "data", &reporter).expect_err("missing directory");

        assert!(matches!(err, TemplateIoError::OutputWrite { path: err_path, .. } if err_path == path));
    }

    #[rstest]
    fn directory_target_fails_and_cleans_up(scratch: ScratchDir) {
        let reporter = RecordingReporter::default();
        scratch.handle().create_dir("taken").expect("create dir");
        let path = scratch.file("taken");

        let err = write_output(&path, "data", &reporter).expect_err("target is a directory");

        assert!(matches!(err, TemplateIoError::OutputWrite { .. }));
        assert_eq!(scratch.entries(), vec!["taken".to_owned()]);
    }

    #[test]
    fn bare_file_names_resolve_against_current_directory() {
        let (parent, file_name) = split_path(Utf8Path::new("out.txt")).expect("split path");

        assert_eq!(parent, Utf8Path::new("."));
        assert_eq!(file_name, "out.txt");
    }
}
