//! Review session - Walks an image set one decision at a time

use std::path::{Path, PathBuf};

use log::info;

use crate::collector::ImageSet;
use crate::error::{Result, SifterError};
use crate::file_ops::{copy_into, prepare_destination, Destination};

/// Where a reviewed image gets filed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Discard,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Keep => "Keep",
            Decision::Discard => "Discard",
        }
    }
}

/// Session state after a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Complete,
}

/// A single pass over one image set into one destination
#[derive(Debug)]
pub struct ReviewSession {
    images: ImageSet,
    cursor: usize,
    destination: Destination,
    kept: usize,
    discarded: usize,
}

impl ReviewSession {
    fn new(images: ImageSet, destination: Destination) -> Self {
        Self {
            images,
            cursor: 0,
            destination,
            kept: 0,
            discarded: 0,
        }
    }

    /// Check the image set, then prepare `dest_root` and start reviewing.
    ///
    /// Nothing is created on disk when `images` is empty.
    pub fn start(images: ImageSet, source_dir: &Path, dest_root: &Path) -> Result<Self> {
        if images.is_empty() {
            return Err(SifterError::NoImagesFound {
                folder: source_dir.to_path_buf(),
            });
        }

        let destination = prepare_destination(dest_root)?;
        info!(
            "Reviewing {} image(s) from {} into {}",
            images.len(),
            source_dir.display(),
            dest_root.display()
        );
        Ok(Self::new(images, destination))
    }

    pub fn state(&self) -> SessionState {
        if self.cursor < self.images.len() {
            SessionState::Active
        } else {
            SessionState::Complete
        }
    }

    /// The image awaiting a decision
    pub fn current(&self) -> Result<&Path> {
        self.images.get(self.cursor).ok_or(SifterError::OutOfRange {
            cursor: self.cursor,
            len: self.images.len(),
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn kept(&self) -> usize {
        self.kept
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn keep(&mut self) -> Result<SessionState> {
        self.decide(Decision::Keep)
    }

    pub fn discard(&mut self) -> Result<SessionState> {
        self.decide(Decision::Discard)
    }

    /// Copy the current image into the chosen category and advance.
    ///
    /// The cursor only moves once the copy has completed.
    pub fn decide(&mut self, decision: Decision) -> Result<SessionState> {
        let source: PathBuf = self.current()?.to_path_buf();
        let target_dir = match decision {
            Decision::Keep => self.destination.keep_dir(),
            Decision::Discard => self.destination.discard_dir(),
        };

        copy_into(&source, target_dir)?;

        match decision {
            Decision::Keep => self.kept += 1,
            Decision::Discard => self.discarded += 1,
        }
        self.cursor += 1;

        let state = self.state();
        if state == SessionState::Complete {
            info!(
                "Session complete: {} kept, {} discarded",
                self.kept, self.discarded
            );
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::collect;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        source: TempDir,
        dest: TempDir,
    }

    impl Fixture {
        fn new(files: &[&str]) -> Self {
            let source = TempDir::new().unwrap();
            for name in files {
                fs::write(source.path().join(name), format!("bytes of {name}")).unwrap();
            }
            Self {
                source,
                dest: TempDir::new().unwrap(),
            }
        }

        fn start(&self) -> Result<ReviewSession> {
            ReviewSession::start(
                collect(self.source.path()),
                self.source.path(),
                self.dest.path(),
            )
        }
    }

    #[test]
    fn test_keep_then_discard_walkthrough() {
        let fx = Fixture::new(&["a.jpg", "b.PNG", "c.txt"]);
        let mut session = fx.start().unwrap();

        assert_eq!(session.len(), 2);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.current().unwrap(), fx.source.path().join("a.jpg"));

        assert_eq!(session.keep().unwrap(), SessionState::Active);
        assert_eq!(session.cursor(), 1);
        let kept = fx.dest.path().join("Keep").join("a.jpg");
        assert_eq!(fs::read(&kept).unwrap(), b"bytes of a.jpg");
        assert!(fx.source.path().join("a.jpg").exists());

        assert_eq!(session.discard().unwrap(), SessionState::Complete);
        assert_eq!(session.cursor(), 2);
        let discarded = fx.dest.path().join("Discard").join("b.PNG");
        assert_eq!(fs::read(&discarded).unwrap(), b"bytes of b.PNG");
        assert!(fx.source.path().join("b.PNG").exists());

        assert_eq!(session.kept(), 1);
        assert_eq!(session.discarded(), 1);
        assert_eq!(session.state(), SessionState::Complete);
    }

    #[test]
    fn test_n_decisions_complete_the_session() {
        let fx = Fixture::new(&["1.jpg", "2.jpg", "3.png", "4.JPG"]);
        let mut session = fx.start().unwrap();

        let decisions = [
            Decision::Discard,
            Decision::Keep,
            Decision::Keep,
            Decision::Discard,
        ];
        for (i, decision) in decisions.iter().enumerate() {
            assert_eq!(session.cursor(), i);
            let state = session.decide(*decision).unwrap();
            let expected = if i + 1 == decisions.len() {
                SessionState::Complete
            } else {
                SessionState::Active
            };
            assert_eq!(state, expected);
        }

        assert_eq!(session.kept(), 2);
        assert_eq!(session.discarded(), 2);
        assert_eq!(fs::read_dir(fx.dest.path().join("Keep")).unwrap().count(), 2);
        assert_eq!(
            fs::read_dir(fx.dest.path().join("Discard")).unwrap().count(),
            2
        );
    }

    #[test]
    fn test_current_on_complete_session_is_out_of_range() {
        let fx = Fixture::new(&["only.png"]);
        let mut session = fx.start().unwrap();
        session.keep().unwrap();

        let err = session.current().unwrap_err();
        assert!(matches!(err, SifterError::OutOfRange { cursor: 1, len: 1 }));
        assert_eq!(session.cursor(), 1);

        assert!(matches!(
            session.discard(),
            Err(SifterError::OutOfRange { .. })
        ));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.discarded(), 0);
    }

    #[test]
    fn test_failed_copy_does_not_advance() {
        let fx = Fixture::new(&["a.jpg", "b.jpg"]);
        let mut session = fx.start().unwrap();
        fs::remove_file(fx.source.path().join("a.jpg")).unwrap();

        let err = session.keep().unwrap_err();
        assert!(matches!(err, SifterError::CopyFailed { .. }));
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.kept(), 0);
        assert_eq!(session.current().unwrap(), fx.source.path().join("a.jpg"));

        // Retry succeeds once the file is back
        fs::write(fx.source.path().join("a.jpg"), b"restored").unwrap();
        assert_eq!(session.keep().unwrap(), SessionState::Active);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_name_collision_last_write_wins() {
        let fx = Fixture::new(&[]);
        for sub in ["first", "second"] {
            let dir = fx.source.path().join(sub);
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("dup.jpg"), sub).unwrap();
        }
        let images = ImageSet::new(vec![
            fx.source.path().join("first").join("dup.jpg"),
            fx.source.path().join("second").join("dup.jpg"),
        ]);

        let mut session =
            ReviewSession::start(images, fx.source.path(), fx.dest.path()).unwrap();
        session.keep().unwrap();
        assert_eq!(session.keep().unwrap(), SessionState::Complete);

        let keep_dir = fx.dest.path().join("Keep");
        assert_eq!(fs::read_dir(&keep_dir).unwrap().count(), 1);
        assert_eq!(fs::read(keep_dir.join("dup.jpg")).unwrap(), b"second");
    }

    #[test]
    fn test_empty_set_creates_nothing() {
        let fx = Fixture::new(&["readme.txt"]);
        let err = fx.start().unwrap_err();

        assert!(matches!(err, SifterError::NoImagesFound { .. }));
        assert!(!fx.dest.path().join("Keep").exists());
        assert!(!fx.dest.path().join("Discard").exists());
    }

    #[test]
    fn test_already_organized_destination_is_rejected() {
        let fx = Fixture::new(&["a.jpg"]);
        fs::create_dir(fx.dest.path().join("Keep")).unwrap();

        let err = fx.start().unwrap_err();
        assert!(matches!(err, SifterError::DestinationAlreadyOrganized { .. }));
        assert!(!fx.dest.path().join("Discard").exists());
    }
}
