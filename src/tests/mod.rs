mod adapter;
mod buffer;
mod mock;
