//! Game core: the cooperative scheduler and its state machines
//!
//! Every machine follows the same shape, run once per call:
//! - `transition(state, &signals)` picks the next state (pure)
//! - the machine's action for the new state updates `SharedState` and drives
//!   outputs
//!
//! Nothing here allocates; all state lives in `SharedState` and the machine
//! structs owned by the `Scheduler`.

pub mod ball;
pub mod collision;
pub mod game;
pub mod paddle;
pub mod state;
pub mod tick;

pub use ball::{BallMachine, BallState};
pub use collision::{CycleReport, advance};
pub use game::{GameMachine, GamePhase};
pub use paddle::{PaddleMachine, PaddleState};
pub use state::{Ball, Bricks, Horizontal, Layer, Paddle, SharedState, Signals, Vertical};
pub use tick::{Scheduler, TickReport};
