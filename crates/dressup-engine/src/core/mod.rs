pub mod scene;
pub mod time;
#[cfg(test)]
pub mod mock;
