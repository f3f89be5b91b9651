//! Location of a run's acquisition config in the data tree

use std::fmt;
use std::path::PathBuf;

/// Station and run whose `acq.cfg` should be read, under a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLocator {
    pub directory: PathBuf,
    pub station: u32,
    pub run: u32,
}

impl RunLocator {
    pub fn new(directory: impl Into<PathBuf>, station: u32, run: u32) -> Self {
        Self {
            directory: directory.into(),
            station,
            run,
        }
    }

    /// `<directory>/station<station>/run<run>/cfg/acq.cfg`
    pub fn config_path(&self) -> PathBuf {
        self.directory
            .join(format!("station{}", self.station))
            .join(format!("run{}", self.run))
            .join("cfg")
            .join("acq.cfg")
    }
}

impl fmt::Display for RunLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station {} run {}", self.station, self.run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_layout() {
        let locator = RunLocator::new("data/handcarry22/rootified", 23, 327);
        assert_eq!(
            locator.config_path(),
            PathBuf::from("data/handcarry22/rootified/station23/run327/cfg/acq.cfg")
        );
    }

    #[test]
    fn test_trailing_separator_in_directory() {
        let locator = RunLocator::new("/data/rootified/", 11, 1);
        assert_eq!(
            locator.config_path(),
            PathBuf::from("/data/rootified/station11/run1/cfg/acq.cfg")
        );
    }
}
