use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gatepass_checkout::flow::BookingService;
use gatepass_core::payment::TransferConfirmation;
use gatepass_shared::{BookTicketsRequest, BookTicketsResponse, Ticket};

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct InitializePaymentRequest<'a> {
    booking_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct InitializePaymentResponse {
    #[serde(alias = "authorization_url")]
    payment_url: String,
}

#[derive(Debug, Serialize)]
struct ConfirmPaymentRequest<'a> {
    booking_id: &'a str,
    #[serde(flatten)]
    confirmation: &'a TransferConfirmation,
}

/// Ticket booking and payment endpoints. This is the HTTP implementation
/// of the checkout flow's `BookingService` seam.
pub struct BookingApi {
    client: ApiClient,
}

impl BookingApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /tickets/my-tickets/
    pub async fn my_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.client.get("/tickets/my-tickets/").await
    }
}

type ServiceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[async_trait]
impl BookingService for BookingApi {
    async fn book(&self, request: BookTicketsRequest) -> ServiceResult<BookTicketsResponse> {
        let response = self.client.post("/tickets/book/", &request).await?;
        Ok(response)
    }

    async fn initialize_payment(&self, booking_id: &str) -> ServiceResult<String> {
        let response: InitializePaymentResponse = self
            .client
            .post("/tickets/initialize-payment/", &InitializePaymentRequest { booking_id })
            .await?;
        Ok(response.payment_url)
    }

    async fn confirm_transfer(
        &self,
        booking_id: &str,
        confirmation: &TransferConfirmation,
    ) -> ServiceResult<()> {
        // Fire-and-forget: the body of a success response is irrelevant
        let _: serde_json::Value = self
            .client
            .post(
                "/tickets/confirm-payment/",
                &ConfirmPaymentRequest {
                    booking_id,
                    confirmation,
                },
            )
            .await?;
        Ok(())
    }
}
