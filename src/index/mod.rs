pub mod sa;
pub mod bwt;
pub mod rank;
pub mod first_column;
pub mod fm;
pub mod locate;
