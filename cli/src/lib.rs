//! Command-line front end for the UniWays user administration API.

pub mod cli;
pub mod commands;
pub mod context;
pub mod output;
pub mod timing;
pub mod token;
