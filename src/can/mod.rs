pub mod manager;
pub mod protocol;
pub mod sim;

pub use manager::SocketCanChannel;
pub use sim::{ParamWrite, SimulatedDevice};
