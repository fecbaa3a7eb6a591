//! # Snake Client Library
//!
//! Presentation client for a server-authoritative snake game. The server owns
//! every rule: movement, collisions, scoring and food placement. This crate
//! renders what the server says, forwards the player's intents, and keeps its
//! view in step with the server by polling on a fixed cadence.
//!
//! ## Synchronization Model
//!
//! Every successful response carries a complete snapshot, and that snapshot
//! replaces the local view wholesale. There is no prediction and no merging:
//! the client only ever shows state the server has confirmed. A failed call
//! is logged and the last confirmed view stays on screen.
//!
//! While a game is running the client issues one tick request every 150 ms.
//! A tick is never sent while the previous one is still outstanding, and a
//! tick that reports game over stops the loop.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! - [`network::Transport`], the fixed HTTP contract, and its reqwest implementation
//! - [`network::Dispatcher`], which runs exchanges on tokio and queues completions
//!
//! ### Game Module (`game`)
//! - [`game::StateStore`], holding the last confirmed snapshot
//! - [`game::ClientGame`], the state machine that turns intents into requests and
//!   folds completions back into the store
//!
//! ### Scheduler Module (`scheduler`)
//! The periodic tick registration, with at most one handle and one tick in flight.
//!
//! ### Input Module (`input`)
//! Keyboard, pointer and touch mapping, with lifecycle gating of intents.
//!
//! ### Presenter Module (`presenter`)
//! Overlay, pause menu, HUD and button state as a pure function of the view.
//!
//! ### Rendering Module (`rendering`)
//! A pure scene builder for the board plus the macroquad backend that draws it.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use client::app::{ClientConfig, SnakeClient};
//!
//! let config = ClientConfig::default();
//! let mut client = SnakeClient::new(&config)?;
//! macroquad::Window::from_config(config.window_conf(), async move {
//!     client.run().await;
//! });
//! ```

pub mod app;
pub mod error;
pub mod game;
pub mod input;
pub mod network;
pub mod presenter;
pub mod rendering;
pub mod scheduler;
