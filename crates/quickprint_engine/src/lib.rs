//! QuickPrint engine: file encoding, history storage and the IO edges of the
//! agent round-trip.
mod callback;
mod encode;
mod engine;
mod history;
mod inspect;
mod launch;
mod persist;
mod types;

pub use callback::{CallbackListener, ListenError};
pub use encode::{
    encode_reader, ChannelProgressSink, ChunkedBase64Encoder, EncodeSettings, PayloadEncoder,
    ProgressSink, DEFAULT_CHUNK_SIZE,
};
pub use engine::EngineHandle;
pub use history::{HistoryStore, HISTORY_FILENAME};
pub use inspect::{inspect_file, InspectError, PDF_SIGNATURE};
pub use launch::{AgentLauncher, LaunchError, SystemLauncher};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use types::{EncodeError, EncodedPayload, EngineEvent};
