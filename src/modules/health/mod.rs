// Liveness and readiness checks

pub mod controllers;
