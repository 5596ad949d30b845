/// Defines the directory where the translated arrays are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/fvbc/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/fvbc/test";

/// Defines the default maximum number of boundary zones (upper bound on zone numbers)
pub const DEFAULT_MAX_ZONES: i32 = 2000;

/// Marks a boundary value as "not given" (the solver's infinity)
pub const UNSET_VALUE: f64 = 1.0e30;

/// Defines the default number of sample points of a 1D profile
pub const DEFAULT_PROFILE_POINTS: usize = 200;
