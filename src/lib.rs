//! Strictly Webgame library - session-synchronized tic-tac-toe client
//!
//! Renders a 3x3 board, turns clicks into `set-mark` moves and keeps the
//! display in step with the web game server's `/session-data/{id}` endpoint.
//!
//! # Architecture
//!
//! - **Registry**: frozen bijection between labels and codes
//! - **Marks/Board**: cell contents, cell addressing, game outcome
//! - **Protocol/Transport**: validated wire shapes and the HTTP client
//! - **View/Sync**: render surface, optimistic moves, revert on rejection
//! - **Terminal**: ratatui front end for the synchronizer
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use strictly_webgame::{BoardSynchronizer, HttpTransport, Mark, MemorySurface};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = HttpTransport::new("http://127.0.0.1:5000", Duration::from_secs(10))?;
//! let surface = MemorySurface::new();
//! let mut page = BoardSynchronizer::new("12345".to_string(), Mark::OMark, transport, surface);
//! page.refresh().await?;
//! page.play_cell(4).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod config;
mod mark;
mod protocol;
mod registry;
mod surface;
mod sync;
mod transport;
mod view;

pub mod terminal;

// Crate-level exports - Registry
pub use registry::{LabelRegistry, RegistryError};

// Crate-level exports - Game types
pub use board::{Board, CELL_COUNT, COLUMNS, Cell, CellOutOfRange, Outcome};
pub use mark::Mark;

// Crate-level exports - Wire protocol and transport
pub use protocol::{MoveRequest, SET_MARK_VERB, SessionSnapshot, SetMarkArgs, SnapshotError};
pub use transport::{HttpTransport, SessionTransport, TransportError, session_id_from_location};

// Crate-level exports - View and synchronization
pub use surface::{MemorySurface, RenderSurface};
pub use sync::{BoardSynchronizer, SyncError, SyncOutcome, SyncPhase};
pub use view::{BoardView, MarkedEvent, ViewError};

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, parse_player_mark};
