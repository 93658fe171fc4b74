//! Owner-scoped todo routes under `/api/todos`.

pub mod handlers;
