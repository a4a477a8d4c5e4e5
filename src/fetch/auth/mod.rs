mod bearer;

pub use bearer::CachedBearer;
