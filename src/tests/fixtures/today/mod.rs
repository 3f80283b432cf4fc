//! A small planner with tasks, appointments and mail folders, all reachable
//! as Relay nodes and through connections.

pub mod schema;
