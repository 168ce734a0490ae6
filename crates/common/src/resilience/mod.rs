//! Resilience patterns for fault tolerance
//!
//! This module provides a generic circuit breaker with a bounded-duration
//! call helper and a clock abstraction (`Clock`, `SystemClock`,
//! `MockClock`) shared with the cache module for deterministic testing.

pub mod circuit_breaker;

// Re-export circuit breaker types
pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState, Clock, ConfigError,
    ConfigResult, MockClock, ResilienceError, ResilienceResult, SystemClock,
};
