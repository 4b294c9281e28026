mod accounts;
mod domain;
mod ids;
mod interest;
mod schedule;
mod transaction;

pub use accounts::{
    Account, AccountDetails, AccountMeta, AccountSummary, NewAccount, UNREGISTERED,
};
pub use domain::{
    Loan, LoanRecord, LoanSeed, Member, MemberOptions, PayBack, Salary, SalaryRecord, Saving,
    SavingRecord,
};
pub use ids::{AccountId, ScheduledTransactionId, TransactionId};
pub use interest::{Interest, InterestSchedule};
pub use schedule::{Period, Schedule, ScheduleEnd};
pub use transaction::{
    INTEREST, PENDING_INTEREST, ScheduledTransaction, Transaction, TransactionDetails,
};
