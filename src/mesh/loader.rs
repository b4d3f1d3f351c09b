use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::mesh::model::Mesh;
use crate::mesh::stl::{StlError, parse_stl};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] StlError),
    #[error("file contains no triangles")]
    Empty,
    #[error("geometry has no extent to normalise")]
    Degenerate,
}

pub enum LoadCommand {
    Load(PathBuf),
    Stop,
}

pub enum LoadResult {
    Loaded { name: String, mesh: Mesh },
    Failed { name: String, error: String },
}

/// Decodes and normalises a mesh from raw file contents.
pub fn load_mesh(data: &[u8]) -> Result<Mesh, LoadError> {
    let mesh = parse_stl(data)?;
    if mesh.triangle_count() == 0 {
        return Err(LoadError::Empty);
    }
    Mesh::normalized(mesh).ok_or(LoadError::Degenerate)
}

pub fn load_mesh_file(path: &Path) -> Result<Mesh, LoadError> {
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_mesh(&data)
}

/// Reads and decodes dropped files off the event loop thread.
pub struct MeshLoader {
    tx_cmd: Sender<LoadCommand>,
    rx_result: Receiver<LoadResult>,
    in_flight: Arc<Mutex<Option<String>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl MeshLoader {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<LoadCommand>();
        let (tx_result, rx_result) = channel::unbounded::<LoadResult>();
        let in_flight = Arc::new(Mutex::new(None));
        let in_flight_clone = Arc::clone(&in_flight);

        let thread_handle = thread::spawn(move || {
            loader_thread(rx_cmd, tx_result, in_flight_clone);
        });

        Self {
            tx_cmd,
            rx_result,
            in_flight,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn load(&self, path: PathBuf) {
        let _ = self.tx_cmd.send(LoadCommand::Load(path));
    }

    pub fn try_recv_result(&self) -> Option<LoadResult> {
        self.rx_result.try_recv().ok()
    }

    /// Name of the file currently being decoded, if any.
    pub fn in_flight(&self) -> Option<String> {
        self.in_flight.lock().clone()
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(LoadCommand::Stop);
    }
}

impl Drop for MeshLoader {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(LoadCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn loader_thread(
    rx_cmd: Receiver<LoadCommand>,
    tx_result: Sender<LoadResult>,
    in_flight: Arc<Mutex<Option<String>>>,
) {
    loop {
        let cmd = match rx_cmd.recv() {
            Ok(c) => c,
            Err(_) => return,
        };

        let path = match cmd {
            LoadCommand::Load(path) => path,
            LoadCommand::Stop => return,
        };

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        *in_flight.lock() = Some(name.clone());

        let result = match load_mesh_file(&path) {
            Ok(mesh) => LoadResult::Loaded { name, mesh },
            Err(e) => LoadResult::Failed {
                name,
                error: e.to_string(),
            },
        };
        *in_flight.lock() = None;

        if tx_result.send(result).is_err() {
            return;
        }
    }
}
