pub mod models;

pub use models::admin::{AdminUser, AuditLogEntry, PlatformAnalytics, PlatformSettings};
pub use models::booking::{BookTicketsRequest, BookTicketsResponse, Ticket, TicketStatus};
pub use models::event::{Event, EventStatus, PricingType, TicketCategory};
pub use models::finance::{
    Bank, BankAccount, PaymentForm, PaymentFormStatus, PayoutAction, PayoutRequest, PayoutStatus,
    Withdrawal,
};
pub use models::user::{Role, User};
