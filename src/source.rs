use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    fs::File,
    io::{self, BufReader, Cursor, Read},
    path::PathBuf,
};

/// the pseudo-files the monitor reads.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ProcFile {
    /// per-interface network counters.
    NetDev,
    /// kernel statistics, including cpu time.
    Stat,
    /// memory usage.
    MemInfo,
}

/// a source of kernel statistics.
pub trait ProcSource {
    /// returns a reader over the contents of the given file.
    fn open(&self, file: ProcFile) -> io::Result<impl Read>;
}

/// stats backed by the `/proc` filesystem.
#[derive(Clone, Debug)]
pub struct ProcFs {
    root: PathBuf,
}

/// a mock stat source.
///
/// each open of a file pops the next queued contents for it.
#[derive(Default)]
#[allow(dead_code, reason = "this is a testing utility.")]
pub struct MockProcFs {
    files: RefCell<BTreeMap<ProcFile, VecDeque<String>>>,
}

// === impl ProcFile ===

impl ProcFile {
    /// the path of this file, relative to the procfs mount point.
    pub const fn path(self) -> &'static str {
        match self {
            Self::NetDev => "net/dev",
            Self::Stat => "stat",
            Self::MemInfo => "meminfo",
        }
    }
}

// === impl ProcFs ===

impl ProcFs {
    const ROOT: &str = "/proc";

    /// reads files relative to a procfs mounted somewhere other than `/proc`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::at(Self::ROOT)
    }
}

impl ProcSource for ProcFs {
    fn open(&self, file: ProcFile) -> io::Result<impl Read> {
        File::open(self.root.join(file.path())).map(BufReader::new)
    }
}

// === impl MockProcFs ===

#[allow(dead_code, reason = "this is a testing utility.")]
impl MockProcFs {
    /// queues the contents returned by the next open of `file`.
    pub fn push(&self, file: ProcFile, contents: impl Into<String>) -> &Self {
        self.files
            .borrow_mut()
            .entry(file)
            .or_default()
            .push_back(contents.into());
        self
    }
}

impl ProcSource for MockProcFs {
    fn open(&self, file: ProcFile) -> io::Result<impl Read> {
        let Self { files } = self;

        files
            .borrow_mut()
            .get_mut(&file)
            .and_then(VecDeque::pop_front)
            .map(Cursor::new)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no mock contents queued for {}", file.path()),
                )
            })
    }
}
