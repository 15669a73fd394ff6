use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use gatepass_checkout::fees::FeeEngine;
use gatepass_checkout::flow::{FlowError, FlowOutcome, Navigation};
use gatepass_checkout::selection::TicketSelection;
use gatepass_core::guard::{self, GuardDecision};
use gatepass_core::payment::{PaymentMethod, TransferConfirmation};
use gatepass_core::validation::{CategoryDraft, EventDraft};
use gatepass_shared::{EventStatus, Role};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "gatepass", about = "Event ticketing client", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Use the admin console login route
        #[arg(long)]
        admin: bool,
    },
    /// Sign up with a Google identity token
    SignupGoogle {
        /// student or organizer
        #[arg(long)]
        role: Role,
        #[arg(long)]
        email: String,
        #[arg(long)]
        id_token: String,
    },
    /// Clear the stored session
    Logout,
    /// Browse and inspect events
    #[command(subcommand)]
    Events(EventsCommand),
    /// Book tickets for an event
    Book {
        event_id: Uuid,
        /// Ticket category to book
        #[arg(long)]
        category: Uuid,
        #[arg(long, default_value_t = 1)]
        quantity: i32,
    },
    /// List my issued tickets
    Tickets,
    /// Resume and settle a pending checkout
    #[command(subcommand)]
    Checkout(CheckoutCommand),
    /// Organizer event management
    #[command(subcommand)]
    Organizer(OrganizerCommand),
    /// Admin console (lighthouse)
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Bank account verification
    #[command(subcommand)]
    Banks(BanksCommand),
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List published events
    List,
    /// Show one event with its ticket categories
    Show { event_id: Uuid },
}

#[derive(Debug, Subcommand)]
pub enum CheckoutCommand {
    /// Show the pending checkout for a booking
    Resume { booking_id: String },
    /// Get the hosted gateway URL for a booking
    Pay { booking_id: String },
    /// Submit a manual-transfer confirmation
    Confirm {
        booking_id: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        amount: f64,
        /// RFC 3339 timestamp of the transfer; defaults to now
        #[arg(long)]
        sent_at: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Subcommand)]
pub enum OrganizerCommand {
    /// List my events
    Events,
    /// Create an event from a JSON draft file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Update an event from a JSON draft file
    Update {
        event_id: Uuid,
        #[arg(long)]
        file: PathBuf,
    },
    /// Add a ticket category from a JSON draft file
    CreateCategory {
        event_id: Uuid,
        #[arg(long)]
        file: PathBuf,
    },
    /// Update a ticket category from a JSON draft file
    UpdateCategory {
        category_id: Uuid,
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Platform headline numbers
    Analytics,
    /// List events awaiting moderation
    Events,
    /// Verify a pending or denied event
    Verify { event_id: Uuid },
    /// Deny an event, with a reason
    Deny {
        event_id: Uuid,
        #[arg(long)]
        reason: String,
    },
    /// List platform users
    Users,
    /// Activate or deactivate a user
    SetUserActive {
        user_id: String,
        #[arg(long)]
        active: bool,
    },
    /// List payout requests with their available actions
    Payouts,
    /// Approve a pending payout
    ApprovePayout { request_id: String },
    /// Reject a pending payout, with a note
    RejectPayout {
        request_id: String,
        #[arg(long)]
        note: String,
    },
    /// Mark an approved payout's transfer completed
    CompletePayout { request_id: String },
    /// Mark an approved payout's transfer failed
    FailPayout { request_id: String },
    /// List withdrawal transactions
    Withdrawals,
    /// List manual-transfer confirmation forms
    PaymentForms,
    /// Confirm a transfer form
    ConfirmForm {
        form_id: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Reject a transfer form, with a note
    RejectForm {
        form_id: String,
        #[arg(long)]
        note: String,
    },
    /// Show platform settings
    Settings,
    /// Update platform settings
    SetSettings {
        #[arg(long)]
        platform_fee: f64,
        #[arg(long)]
        maintenance: bool,
    },
    /// Show the audit log
    Audit,
}

#[derive(Debug, Subcommand)]
pub enum BanksCommand {
    /// List supported banks
    List,
    /// Resolve an account name
    Verify {
        #[arg(long)]
        account: String,
        #[arg(long)]
        bank_code: String,
        /// Use the fallback provider
        #[arg(long)]
        fallback: bool,
    },
}

pub async fn run(state: AppState, cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Login {
            email,
            password,
            admin,
        } => {
            let session = if admin {
                state.auth().admin_login(&email, &password).await?
            } else {
                state.auth().login(&email, &password).await?
            };
            let role = session.role.map(|r| r.to_string()).unwrap_or_default();
            println!("Logged in as {} ({})", email, role);
        }

        Command::SignupGoogle {
            role,
            email,
            id_token,
        } => {
            state.auth().google_signup(role, &email, &id_token).await?;
            println!("Signed up and logged in as {} ({})", email, role);
        }

        Command::Logout => {
            state.auth().logout().await?;
            println!("Logged out");
        }

        Command::Events(EventsCommand::List) => {
            for event in state.events().list().await? {
                println!(
                    "{}  {}  {}  {}",
                    event.event_id, event.date.date_naive(), event.name, event.location
                );
            }
        }

        Command::Events(EventsCommand::Show { event_id }) => {
            let event = state.events().detail(&event_id).await?;
            println!("{} - {} ({})", event.name, event.location, event.date);
            for category in &event.ticket_categories {
                let note = if category.is_sold_out {
                    " [sold out]"
                } else if !category.is_active {
                    " [inactive]"
                } else {
                    ""
                };
                println!(
                    "  {}  {}  ₦{}  ({} left){}",
                    category.category_id,
                    category.name,
                    category.price,
                    category.available_quantity,
                    note
                );
            }
        }

        Command::Book {
            event_id,
            category,
            quantity,
        } => {
            let event = state.events().detail(&event_id).await?;

            let mut selection = TicketSelection::for_event(&event);
            // Restore any picks stashed before a login round trip
            if state
                .flow
                .restore_pending(&event, &mut selection)
                .await
                .unwrap_or(false)
            {
                println!("Restored your saved ticket selection");
            }
            for _ in 0..quantity {
                selection.increment(&category).map_err(|e| anyhow::anyhow!("{}", e))?;
            }

            // Unauthenticated users keep their picks across the login bounce
            let session = state.sessions.current();
            match guard::evaluate(
                state.sessions.hydrated(),
                &session,
                None,
                &format!("/events/{}", event_id),
            ) {
                GuardDecision::RedirectToLogin { .. } => {
                    state.flow.stash_pending(&event, &selection).await?;
                    println!("Please log in first; your selection is saved for 30 minutes.");
                    return Ok(());
                }
                GuardDecision::RedirectHome | GuardDecision::Pending => {
                    println!("Please log in first.");
                    return Ok(());
                }
                GuardDecision::Allow => {}
            }

            let quote = FeeEngine::new(state.config.fees.clone()).quote(selection.subtotal());
            if !event.is_free() && quote.subtotal > 0.0 {
                println!(
                    "Subtotal ₦{}  platform fee ₦{}  gateway fee ₦{}  total ₦{}",
                    quote.subtotal, quote.platform_fee, quote.gateway_fee, quote.total
                );
            }

            render_outcome(state.flow.submit(&event, &selection).await?);
        }

        Command::Tickets => {
            for ticket in state.bookings().my_tickets().await? {
                println!(
                    "{}  {}  {}  {:?}",
                    ticket.ticket_id, ticket.event_name, ticket.category_name, ticket.status
                );
            }
        }

        Command::Checkout(CheckoutCommand::Resume { booking_id }) => {
            match state.flow.resume(&booking_id).await {
                Ok(snapshot) => {
                    println!(
                        "{} - {} × {} at ₦{} each",
                        snapshot.event_name,
                        snapshot.category_name,
                        snapshot.quantity,
                        snapshot.price_per_ticket
                    );

                    let mut methods = vec![];
                    if let Some(url) = &snapshot.payment_url {
                        methods.push(PaymentMethod::HostedRedirect {
                            payment_url: url.clone(),
                        });
                    }
                    if let Some(details) = state.config.payment.manual_transfer.clone() {
                        methods.push(PaymentMethod::ManualTransfer { details });
                    }
                    for method in &methods {
                        match method {
                            PaymentMethod::HostedRedirect { payment_url } => {
                                println!("Pay now: {}", payment_url);
                            }
                            PaymentMethod::ManualTransfer { details } => {
                                println!(
                                    "Manual transfer: {} / {} / {}",
                                    details.bank_name, details.account_number, details.account_name
                                );
                            }
                        }
                    }
                    println!("Continue with: gatepass checkout pay {}", booking_id);
                }
                Err(FlowError::SessionExpired) => {
                    // Terminal: no recovery path besides a fresh booking
                    println!("This checkout session has expired. Please book again.");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::Checkout(CheckoutCommand::Pay { booking_id }) => {
            render_outcome(state.flow.pay_now(&booking_id).await?);
        }

        Command::Checkout(CheckoutCommand::Confirm {
            booking_id,
            first_name,
            last_name,
            amount,
            sent_at,
        }) => {
            let confirmation = TransferConfirmation {
                first_name,
                last_name,
                amount_sent: amount,
                sent_at: sent_at.unwrap_or_else(Utc::now),
            };
            state.flow.confirm_transfer(&booking_id, &confirmation).await?;
            println!("Transfer confirmation submitted; an admin will reconcile it.");
        }

        Command::Organizer(cmd) => run_organizer(&state, cmd).await?,
        Command::Admin(cmd) => run_admin(&state, cmd).await?,
        Command::Banks(cmd) => run_banks(&state, cmd).await?,
    }

    Ok(())
}

async fn run_organizer(state: &AppState, cmd: OrganizerCommand) -> anyhow::Result<()> {
    match cmd {
        OrganizerCommand::Events => {
            for event in state.events().organizer_events().await? {
                println!("{}  {}  [{}]", event.event_id, event.name, event.status);
            }
        }
        OrganizerCommand::Create { file } => {
            let draft: EventDraft = read_json(&file)?;
            let event = state.organizer().create_event(&draft).await?;
            println!("Created event {} ({})", event.name, event.event_id);
        }
        OrganizerCommand::Update { event_id, file } => {
            let draft: EventDraft = read_json(&file)?;
            let event = state.organizer().update_event(&event_id, &draft).await?;
            println!("Updated event {}", event.event_id);
        }
        OrganizerCommand::CreateCategory { event_id, file } => {
            let draft: CategoryDraft = read_json(&file)?;
            let category = state.organizer().create_category(&event_id, &draft).await?;
            println!("Created category {} ({})", category.name, category.category_id);
        }
        OrganizerCommand::UpdateCategory { category_id, file } => {
            let draft: CategoryDraft = read_json(&file)?;
            let category = state.organizer().update_category(&category_id, &draft).await?;
            println!("Updated category {}", category.category_id);
        }
    }
    Ok(())
}

async fn run_admin(state: &AppState, cmd: AdminCommand) -> anyhow::Result<()> {
    // The whole console is admin-only; check before issuing any call
    let session = state.sessions.current();
    if guard::evaluate(state.sessions.hydrated(), &session, Some(Role::Admin), "/lighthouse")
        != GuardDecision::Allow
    {
        println!("The admin console requires an admin login.");
        return Ok(());
    }

    let admin = state.admin();
    match cmd {
        AdminCommand::Analytics => {
            let a = admin.analytics().await?;
            println!(
                "events {}  users {}  bookings {}  revenue ₦{}",
                a.total_events, a.total_users, a.total_bookings, a.total_revenue
            );
        }
        AdminCommand::Events => {
            for event in admin.events().await? {
                println!("{}  {}  [{}]", event.event_id, event.name, event.status);
            }
        }
        AdminCommand::Verify { event_id } => {
            let event = find_event(&admin, &event_id).await?;
            admin.set_event_status(&event, EventStatus::Verified, None).await?;
            println!("Event verified");
        }
        AdminCommand::Deny { event_id, reason } => {
            let event = find_event(&admin, &event_id).await?;
            admin
                .set_event_status(&event, EventStatus::Denied, Some(&reason))
                .await?;
            println!("Event denied");
        }
        AdminCommand::Users => {
            for user in admin.users().await? {
                let flag = if user.is_active { "active" } else { "disabled" };
                println!("{}  {}  {}  {}", user.user_id, user.email, user.role, flag);
            }
        }
        AdminCommand::SetUserActive { user_id, active } => {
            admin.set_user_active(&user_id, active).await?;
            println!("User updated");
        }
        AdminCommand::Payouts => {
            for payout in admin.payout_requests().await? {
                let actions: Vec<String> = payout
                    .status
                    .available_actions()
                    .iter()
                    .map(|a| format!("{:?}", a))
                    .collect();
                let hint = match payout.status {
                    gatepass_shared::PayoutStatus::Approved => " (awaiting transfer)",
                    _ => "",
                };
                println!(
                    "{}  {}  ₦{}  [{}]{}  actions: {}",
                    payout.request_id,
                    payout.organizer_name,
                    payout.amount,
                    payout.status,
                    hint,
                    if actions.is_empty() { "none".to_string() } else { actions.join(", ") }
                );
            }
        }
        AdminCommand::ApprovePayout { request_id } => {
            admin.approve_payout(&request_id).await?;
            println!("Payout approved; wallet debited, transfer pending");
        }
        AdminCommand::RejectPayout { request_id, note } => {
            admin.reject_payout(&request_id, &note).await?;
            println!("Payout rejected");
        }
        AdminCommand::CompletePayout { request_id } => {
            admin.complete_payout(&request_id).await?;
            println!("Payout marked completed");
        }
        AdminCommand::FailPayout { request_id } => {
            admin.fail_payout(&request_id).await?;
            println!("Payout marked failed; wallet refunded server-side");
        }
        AdminCommand::Withdrawals => {
            for w in admin.withdrawals().await? {
                println!(
                    "{}  {}  ₦{}  [{}]",
                    w.transaction_id, w.organizer_name, w.amount, w.status
                );
            }
        }
        AdminCommand::PaymentForms => {
            for form in admin.payment_forms().await? {
                println!(
                    "{}  {} {}  ₦{}  {:?}",
                    form.id, form.first_name, form.last_name, form.amount_sent, form.status
                );
            }
        }
        AdminCommand::ConfirmForm { form_id, notes } => {
            admin.confirm_payment_form(&form_id, notes.as_deref()).await?;
            println!("Payment form confirmed");
        }
        AdminCommand::RejectForm { form_id, note } => {
            admin.reject_payment_form(&form_id, &note).await?;
            println!("Payment form rejected");
        }
        AdminCommand::Settings => {
            let settings = admin.settings().await?;
            println!(
                "platform fee ₦{}  maintenance {}",
                settings.platform_fee, settings.maintenance_mode
            );
        }
        AdminCommand::SetSettings {
            platform_fee,
            maintenance,
        } => {
            let settings = admin
                .update_settings(&gatepass_shared::PlatformSettings {
                    platform_fee,
                    maintenance_mode: maintenance,
                })
                .await?;
            println!(
                "Settings saved: platform fee ₦{}  maintenance {}",
                settings.platform_fee, settings.maintenance_mode
            );
        }
        AdminCommand::Audit => {
            for entry in admin.audit_logs().await? {
                println!("{}  {}  {}  {}", entry.at, entry.actor, entry.action, entry.target);
            }
        }
    }
    Ok(())
}

async fn run_banks(state: &AppState, cmd: BanksCommand) -> anyhow::Result<()> {
    let banks = state.banks();
    match cmd {
        BanksCommand::List => {
            for bank in banks.list_banks().await? {
                println!("{}  {}", bank.code, bank.name);
            }
        }
        BanksCommand::Verify {
            account,
            bank_code,
            fallback,
        } => {
            let resolved = if fallback {
                banks.verify_account_fallback(&account, &bank_code).await?
            } else {
                banks.verify_account(&account, &bank_code).await?
            };
            println!(
                "{}  {}  ({})",
                resolved.account_number, resolved.account_name, resolved.bank_code
            );
        }
    }
    Ok(())
}

async fn find_event(
    admin: &crate::admin::AdminService,
    event_id: &Uuid,
) -> Result<gatepass_shared::Event, ApiError> {
    admin
        .events()
        .await?
        .into_iter()
        .find(|e| e.event_id == *event_id)
        .ok_or_else(|| ApiError::Api {
            status: 404,
            message: "Event not found".to_string(),
        })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn render_outcome(outcome: FlowOutcome) {
    match outcome {
        FlowOutcome::Redirect { url } => {
            println!("Open this URL to complete payment:\n  {}", url);
        }
        FlowOutcome::Navigate(Navigation::CheckoutPayment { booking_id }) => {
            println!(
                "Booking created. Continue with:\n  gatepass checkout pay {}\n  gatepass checkout confirm {} --first-name ... --last-name ... --amount ...",
                booking_id, booking_id
            );
        }
        FlowOutcome::Navigate(Navigation::MyTickets) => {
            println!("Tickets issued. See them with: gatepass tickets");
        }
        FlowOutcome::Navigate(Navigation::Login { .. }) => {
            println!("Please log in first: gatepass login --email ... --password ...");
        }
    }
}
