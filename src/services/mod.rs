pub mod equipment;
pub mod goals;
pub mod ingest;
pub mod ladder;
pub mod progression;
pub mod progressive_overload;
pub mod report;
pub mod routine_update;
pub mod trend;
