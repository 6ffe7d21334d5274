pub mod block;

pub use block::ContentBlock;
