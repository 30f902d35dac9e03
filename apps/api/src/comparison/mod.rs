// Comparison Client: second, independent schema-constrained call comparing a
// user profile with an existing analysis. Same single-attempt contract.

pub mod comparator;
