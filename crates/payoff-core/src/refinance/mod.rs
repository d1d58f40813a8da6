pub mod comparison;

pub use comparison::{
    compare_refinance, ComparisonMode, RefinanceComparison, RefinanceInput, RefinanceOffer,
    RefinanceQuote,
};
