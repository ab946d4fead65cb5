//! Branch and period rollups for dashboard screens.
//!
//! Revenue, profit, expenses and low-stock counts derived from sales,
//! expense and bonus records plus the catalog and ledger snapshots. Empty
//! inputs produce all-zero summaries.

pub mod records;
pub mod scope;
pub mod summary;

pub use records::{Bonus, BonusRecord, Expense, ExpenseRecord, Sale, SaleRecord};
pub use scope::{Period, ReportScope, StaffMember};
pub use summary::{BranchSummary, ReportInputs, ReportsConfig, low_stock_products, summarize, summarize_all};
