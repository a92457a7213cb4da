#![allow(dead_code)]

pub mod czds_server;
pub mod helpers;
