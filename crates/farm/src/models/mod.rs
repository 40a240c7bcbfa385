//! Domain models for the farm tables.
//!
//! Each table has a row type (what a `SELECT` returns) and input types for
//! writes. Inputs never carry ids, `created_at`, or `sales.total_amount`;
//! those are assigned by the database.

pub mod batch;
pub mod batch_log;
pub mod customer;
pub mod environment;
pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;
pub mod staff;

pub use batch::{Batch, BatchFilter, BatchSummary, CreateBatchInput, UpdateBatchInput};
pub use batch_log::{
    Feeding, Harvest, HarvestTotals, MortalityRecord, RecordFeedingInput, RecordHarvestInput,
    RecordMortalityInput,
};
pub use customer::{CreateCustomerInput, Customer, UpdateCustomerInput};
pub use environment::{EnvironmentFilter, EnvironmentLog, RecordEnvironmentInput};
pub use inventory::{CreateInventoryItemInput, InventoryItem, UpdateInventoryItemInput};
pub use product::{CreateProductInput, Product};
pub use report::{CreateReportInput, Report, ReportFilter};
pub use sale::{
    CreateSaleInput, CreateTransactionInput, Sale, SaleFilter, SaleWithPayment, Transaction,
    UpdateSaleInput,
};
pub use staff::{CreateStaffInput, Staff, UpdateStaffInput};
