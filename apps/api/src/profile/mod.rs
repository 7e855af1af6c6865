// Contact profiles: boundary validation and the append-only store behind ProfileSink.

pub mod handlers;
pub mod sink;
pub mod validation;
