use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use perks_core::search::{
    FlightSearchParams, FlightSearchQuery, HotelSearchParams, HotelSearchQuery, PackageSearchParams,
    PackageSearchQuery, ProductSearchParams, ProductSearchQuery,
};
use perks_core::simulator::{HotelSimulator, SimResult, ShoppingSimulator, SimulatorError, TravelSimulator};
use perks_offer::{CustomerOffer, DiscountRules, OfferBook, OfferCategory, UsageClaim};
use perks_shared::models::hotel::{
    CitiesResponse, HotelBookingConfirmation, HotelBookingRecord, HotelBookingRequest,
};
use perks_shared::models::shopping::{
    BrandsResponse, CartAddRequest, CartItem, CategoriesResponse, OrderConfirmation, OrderRequest, OrderStatus,
    ProductDetails,
};
use perks_shared::models::travel::{
    AirportsResponse, FlightBookingConfirmation, FlightBookingRecord, FlightBookingRequest,
};
use perks_shared::models::CancellationOutcome;

use crate::error::{AggResult, AggregateError, Leg};
use crate::package::build_packages;
use crate::response::{
    BookingReceipt, FlightResults, HotelResults, OfferBooking, PackageResults, Priced, ProductResults,
    ServiceResponse,
};

/// Answers customer-facing queries by calling the partner simulators and
/// pricing their results with the customer's offers.
#[derive(Clone)]
pub struct Aggregator {
    travel: Arc<dyn TravelSimulator>,
    hotel: Arc<dyn HotelSimulator>,
    shopping: Arc<dyn ShoppingSimulator>,
    offers: OfferBook,
}

/// Falls back to an empty body with a warning when the partner is down.
/// A request the partner refused is the caller's error and is returned as such.
fn degrade<T: Default>(result: SimResult<T>) -> AggResult<ServiceResponse<T>> {
    match result {
        Ok(body) => Ok(ServiceResponse::ok(body)),
        Err(err) if err.is_outage() => {
            warn!("Serving degraded response: {}", err);
            Ok(ServiceResponse::degraded(&err))
        }
        Err(err) => Err(err.into()),
    }
}

/// A use of the customer's offer held while the partner books.
struct Reservation {
    customer_id: String,
    offer_id: Uuid,
    savings: f64,
    usage: CustomerOffer,
}

fn price_all<T>(items: Vec<T>, rules: &DiscountRules, base: impl Fn(&T) -> f64) -> Vec<Priced<T>> {
    items
        .into_iter()
        .map(|item| {
            let pricing = rules.price(base(&item));
            Priced { item, pricing }
        })
        .collect()
}

impl Aggregator {
    pub fn new(
        travel: Arc<dyn TravelSimulator>,
        hotel: Arc<dyn HotelSimulator>,
        shopping: Arc<dyn ShoppingSimulator>,
        offers: OfferBook,
    ) -> Self {
        Self {
            travel,
            hotel,
            shopping,
            offers,
        }
    }

    pub fn offers(&self) -> &OfferBook {
        &self.offers
    }

    async fn rules(
        &self,
        customer_id: Option<&str>,
        category: OfferCategory,
        now: DateTime<Utc>,
    ) -> AggResult<DiscountRules> {
        Ok(self.offers.rules_for(customer_id, category, now).await?)
    }

    // ------------------------------------------------------------------
    // Degradable reads
    // ------------------------------------------------------------------

    pub async fn airports(&self) -> AggResult<ServiceResponse<AirportsResponse>> {
        degrade(self.travel.airports().await)
    }

    pub async fn cities(&self) -> AggResult<ServiceResponse<CitiesResponse>> {
        degrade(self.hotel.cities().await)
    }

    pub async fn categories(&self) -> AggResult<ServiceResponse<CategoriesResponse>> {
        degrade(self.shopping.categories().await)
    }

    pub async fn brands(&self, category: Option<&str>) -> AggResult<ServiceResponse<BrandsResponse>> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        degrade(self.shopping.brands(category).await)
    }

    pub async fn search_flights(
        &self,
        params: &FlightSearchParams,
        now: DateTime<Utc>,
    ) -> AggResult<ServiceResponse<FlightResults>> {
        let query = FlightSearchQuery::from_params(params)?;
        let rules = self.rules(params.customer_id.as_deref(), OfferCategory::Travel, now).await?;

        let result = self.travel.search_flights(&query).await.map(|found| {
            let flights = price_all(found.flights, &rules, |f| f.total_price);
            FlightResults {
                search_criteria: Some(found.search_criteria),
                count: flights.len(),
                flights,
            }
        });
        degrade(result)
    }

    pub async fn search_hotels(
        &self,
        params: &HotelSearchParams,
        now: DateTime<Utc>,
    ) -> AggResult<ServiceResponse<HotelResults>> {
        let query = HotelSearchQuery::from_params(params)?;
        let rules = self.rules(params.customer_id.as_deref(), OfferCategory::Travel, now).await?;

        let result = self.hotel.search_hotels(&query).await.map(|found| {
            let hotels = price_all(found.hotels, &rules, |h| h.min_price);
            HotelResults {
                search_criteria: Some(found.search_criteria),
                count: hotels.len(),
                hotels,
            }
        });
        degrade(result)
    }

    pub async fn search_products(
        &self,
        params: &ProductSearchParams,
        now: DateTime<Utc>,
    ) -> AggResult<ServiceResponse<ProductResults>> {
        let query = ProductSearchQuery::from_params(params)?;
        let rules = self.rules(params.customer_id.as_deref(), OfferCategory::Shopping, now).await?;

        let result = self.shopping.search_products(&query).await.map(|found| {
            let products = price_all(found.products, &rules, |p| p.price);
            ProductResults {
                search_criteria: Some(found.search_criteria),
                total_count: products.len(),
                has_more: found.has_more,
                products,
            }
        });
        degrade(result)
    }

    // ------------------------------------------------------------------
    // Travel packages
    // ------------------------------------------------------------------

    /// Searches flights and hotels at the same time; both legs must answer.
    pub async fn search_packages(&self, params: &PackageSearchParams, now: DateTime<Utc>) -> AggResult<PackageResults> {
        let query = PackageSearchQuery::from_params(params)?;
        let rules = self.rules(params.customer_id.as_deref(), OfferCategory::Travel, now).await?;
        let flight_query = query.flight_query();
        let hotel_query = query.hotel_query();

        let (flights, hotels) = tokio::join!(
            self.travel.search_flights(&flight_query),
            self.hotel.search_hotels(&hotel_query)
        );

        let (flights, hotels) = match (flights, hotels) {
            (Ok(flights), Ok(hotels)) => (flights, hotels),
            (flights, hotels) => {
                let failures: Vec<(Leg, SimulatorError)> = [(Leg::Flight, flights.err()), (Leg::Hotel, hotels.err())]
                    .into_iter()
                    .filter_map(|(leg, err)| err.map(|e| (leg, e)))
                    .collect();
                if let Some((_, refused)) = failures.iter().find(|(_, err)| !err.is_outage()) {
                    return Err(refused.clone().into());
                }
                warn!(
                    "Package search {} -> {} failed on {} leg(s)",
                    query.origin,
                    query.destination,
                    failures.len()
                );
                return Err(AggregateError::partial_failure(failures));
            }
        };

        let travel_packages = build_packages(&flights.flights, &hotels, &rules);
        info!(
            "Package search {} -> {}: {} packages from {} flights and {} hotels",
            query.origin,
            query.destination,
            travel_packages.len(),
            flights.flights.len(),
            hotels.hotels.len()
        );
        Ok(PackageResults {
            search_criteria: query,
            count: travel_packages.len(),
            travel_packages,
            flights_considered: flights.flights.len(),
            hotels_considered: hotels.hotels.len(),
        })
    }

    // ------------------------------------------------------------------
    // Pass-through operations
    // ------------------------------------------------------------------

    /// Takes one use of the quoted offer before the partner is asked to book.
    ///
    /// `charged` is what the request says the customer pays; the offer's own
    /// discount on `charged + discount_applied` bounds the saving claimed.
    async fn reserve_offer<T>(
        &self,
        booking: &OfferBooking<T>,
        category: OfferCategory,
        charged: Option<f64>,
        now: DateTime<Utc>,
    ) -> AggResult<Option<Reservation>> {
        let customer_id = booking.customer_id.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let (customer_id, offer_id) = match (customer_id, booking.offer_id) {
            (Some(customer_id), Some(offer_id)) => (customer_id, offer_id),
            (None, Some(_)) => return Err(AggregateError::Validation {
                field: "customer_id".to_string(),
                message: "is required when booking with an offer".to_string(),
            }),
            _ => return Ok(None),
        };
        let charged = charged.ok_or_else(|| AggregateError::Validation {
            field: "total_price".to_string(),
            message: "is required when booking with an offer".to_string(),
        })?;

        let claim = UsageClaim {
            customer_id,
            offer_id,
            category,
            base_price: charged + booking.discount_applied,
            savings: booking.discount_applied,
        };
        let usage = self.offers.reserve_usage(&claim, now).await?;
        Ok(Some(Reservation {
            customer_id: customer_id.to_string(),
            offer_id,
            savings: booking.discount_applied,
            usage,
        }))
    }

    /// Hands back the reserved use when the partner did not book.
    async fn settle<T>(&self, outcome: SimResult<T>, reservation: Option<Reservation>) -> AggResult<BookingReceipt<T>> {
        match outcome {
            Ok(confirmation) => Ok(BookingReceipt {
                confirmation,
                offer_usage: reservation.map(|r| r.usage),
            }),
            Err(err) => {
                if let Some(r) = reservation {
                    if let Err(release_err) = self.offers.release_usage(&r.customer_id, r.offer_id, r.savings).await {
                        warn!("Could not release offer {} for {}: {}", r.offer_id, r.customer_id, release_err);
                    }
                }
                Err(err.into())
            }
        }
    }

    pub async fn book_flight(
        &self,
        booking: OfferBooking<FlightBookingRequest>,
        now: DateTime<Utc>,
    ) -> AggResult<BookingReceipt<FlightBookingConfirmation>> {
        let reservation = self
            .reserve_offer(&booking, OfferCategory::Travel, booking.request.total_price, now)
            .await?;
        let outcome = self.travel.book_flight(&booking.request).await;
        if let Ok(confirmation) = &outcome {
            info!("Flight {} booked: {}", booking.request.flight_id, confirmation.booking_reference);
        }
        self.settle(outcome, reservation).await
    }

    pub async fn book_hotel(
        &self,
        booking: OfferBooking<HotelBookingRequest>,
        now: DateTime<Utc>,
    ) -> AggResult<BookingReceipt<HotelBookingConfirmation>> {
        let reservation = self
            .reserve_offer(&booking, OfferCategory::Travel, booking.request.total_price, now)
            .await?;
        let outcome = self.hotel.book_hotel(&booking.request).await;
        if let Ok(confirmation) = &outcome {
            info!("Hotel {} booked: {}", booking.request.hotel_id, confirmation.booking_reference);
        }
        self.settle(outcome, reservation).await
    }

    pub async fn create_order(
        &self,
        booking: OfferBooking<OrderRequest>,
        now: DateTime<Utc>,
    ) -> AggResult<BookingReceipt<OrderConfirmation>> {
        let items_total: f64 = booking
            .request
            .items
            .iter()
            .map(|line| line.price * f64::from(line.quantity))
            .sum();
        let reservation = self
            .reserve_offer(&booking, OfferCategory::Shopping, Some(items_total), now)
            .await?;
        let outcome = self.shopping.create_order(&booking.request).await;
        if let Ok(confirmation) = &outcome {
            info!("Order {} created for {} item(s)", confirmation.order_id, booking.request.items.len());
        }
        self.settle(outcome, reservation).await
    }

    pub async fn flight_booking(&self, reference: &str) -> AggResult<FlightBookingRecord> {
        Ok(self.travel.booking(reference).await?)
    }

    pub async fn cancel_flight(&self, booking_id: &str) -> AggResult<CancellationOutcome> {
        Ok(self.travel.cancel_booking(booking_id).await?)
    }

    pub async fn hotel_booking(&self, reference: &str) -> AggResult<HotelBookingRecord> {
        Ok(self.hotel.booking(reference).await?)
    }

    pub async fn cancel_hotel(&self, booking_id: &str) -> AggResult<CancellationOutcome> {
        Ok(self.hotel.cancel_booking(booking_id).await?)
    }

    pub async fn product(&self, product_id: &str) -> AggResult<ProductDetails> {
        Ok(self.shopping.product(product_id).await?)
    }

    pub async fn add_to_cart(&self, request: &CartAddRequest) -> AggResult<CartItem> {
        Ok(self.shopping.add_to_cart(request).await?)
    }

    pub async fn order(&self, order_id: &str) -> AggResult<OrderStatus> {
        Ok(self.shopping.order(order_id).await?)
    }

    pub async fn cancel_order(&self, order_id: &str) -> AggResult<CancellationOutcome> {
        Ok(self.shopping.cancel_order(order_id).await?)
    }
}
