pub mod disc;
pub mod io;
