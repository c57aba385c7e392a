use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_EXPENSE_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_CATEGORY_LENGTH: usize = 50;

pub const MAX_TARGET_AMOUNT: Decimal = dec!(100_000_000);
pub const MAX_EXPENSE_AMOUNT: Decimal = dec!(1_000_000);

/// Categories offered to clients when recording an expense. Free-text
/// categories outside this list are still accepted.
pub const SUGGESTED_CATEGORIES: [&str; 10] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Healthcare",
    "Utilities",
    "Education",
    "Travel",
    "Insurance",
    "Other",
];
