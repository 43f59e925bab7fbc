pub mod fifo;

pub use fifo::FifoQueue;
