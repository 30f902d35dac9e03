// Schema contract with the external model: what we ask and the shape we
// require back. Both the analysis and the comparison client build their
// requests from here and nowhere else.

pub mod prompts;
pub mod schema;
