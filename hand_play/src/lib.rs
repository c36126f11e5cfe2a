//! # hand_play
//!
//! Two small hand-gesture interactions on top of `hand_gesture`: a per-zone
//! fist counter and a drag-and-drop box game. Landmarks come from a detector
//! process, a recorded JSON-lines file, or a mouse-driven simulator.
//!
//! ## Threads
//!
//! A detection thread owns the landmark source and the per-frame logic and
//! publishes its results into latest-value cells. The render thread reads
//! whatever is newest at its own rate and never blocks on detection.
//!
//! ## Modes
//!
//! | Mode | Input | Effect |
//! |---|---|---|
//! | `counter` | Open hand closes into a fist | Count for that hand's zone goes up |
//! | `counter` | Hand present in a zone | Zone is highlighted |
//! | `boxes` | Fist over a box | Box is picked up and follows the fingertip |
//! | `boxes` | Hand opens | Held box is dropped where it is |
//!
//! ## Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse over the camera panel | Index fingertip position |
//! | Mouse leaves the panel | Hand disappears |
//! | Left button / `Space` held | Fist |
//! | `Q` / `Escape` | Quit |

pub mod latest;
pub mod frame;
pub mod source;
pub mod sim;
pub mod replay;
pub mod counter;
pub mod dragbox;
pub mod config;
pub mod visualizer;
pub mod app;
