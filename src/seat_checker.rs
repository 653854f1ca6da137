use log::{error, info, warn};
use reqwest::header::USER_AGENT;
use reqwest::{Client, Response};

use crate::data_structs::app_config::CheckerConfig;
use crate::data_structs::course_watch::CourseWatch;
use crate::data_structs::seat_response::SeatResponse;
use crate::errors::CheckError;
use crate::seat_parser::parse_seats_avail;

#[derive(Debug, PartialEq, Eq)]
#[derive(Clone, Copy)]
pub enum CheckOutcome {
    /// Seats are open. `notified` is false when no webhook is configured.
    OpenSeats { seats: u32, notified: bool },
    NoSeats,
    /// The `seats` fragment had no `seats_avail` count in it.
    SeatsNotFound,
}

impl CheckOutcome {
    pub fn triggered(&self) -> bool {
        matches!(self, CheckOutcome::OpenSeats { notified: true, .. })
    }
}

#[derive(Debug, PartialEq, Eq)]
#[derive(Default)]
#[derive(Clone)]
pub struct RunSummary {
    pub checked: Vec<String>,
    pub triggered: Vec<String>,
    pub errored: Vec<String>,
}

impl RunSummary {
    pub fn any_triggered(&self) -> bool {
        !self.triggered.is_empty()
    }
}

pub struct SeatChecker {
    client: Client,
    config: CheckerConfig,
}

impl SeatChecker {

    pub fn new(config: CheckerConfig) -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;
        return Ok(SeatChecker { client, config })
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Checks every configured course once, in order. A failing course is
    /// logged and skipped; it never stops the rest of the run.
    pub async fn run(&self) -> RunSummary {
        if self.config.webhook_url.is_none() {
            warn!("WEBHOOK_URL is not set. Seats will be checked but no alert will be sent.");
        }

        let mut summary = RunSummary::default();
        for course in &self.config.courses {
            summary.checked.push(course.name.clone());
            match self.check(course).await {
                Ok(outcome) => {
                    if outcome.triggered() {
                        summary.triggered.push(course.name.clone());
                    }
                }
                Err(e) => {
                    error!("Error checking {}: {}", course.name, e);
                    summary.errored.push(course.name.clone());
                }
            }
        }

        if !summary.any_triggered() {
            info!("All courses checked; no alerts triggered this run.");
        }
        info!("Run finished: {} checked, {} triggered, {} errored",
              summary.checked.len(), summary.triggered.len(), summary.errored.len());
        summary
    }

    /// Looks up one course and fires the webhook if it has open seats.
    pub async fn check(&self, course: &CourseWatch) -> Result<CheckOutcome, CheckError> {
        info!("----- Checking {} -----", course.name);

        let response = self.client.post(&self.config.search_url)
            .header(USER_AGENT, &self.config.user_agent)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&course.body)
            .send().await?;
        let response = ensure_success(response, &self.config.search_url)?;

        let data = SeatResponse::from_json(&response.text().await?)?;
        info!("Course from API: {} (CRN {}) - {}", data.code(), data.crn(), data.title());

        let seats_html = data.seats_html();
        info!("Seats HTML: {}", seats_html);

        let seats = match parse_seats_avail(seats_html) {
            Some(seats) => seats,
            None => {
                warn!("Could not find seats_avail in the response for {}", course.name);
                return Ok(CheckOutcome::SeatsNotFound);
            }
        };
        info!("Parsed seats_avail = {}", seats);

        if seats == 0 {
            info!("No open seats for {}. Not triggering webhook.", course.name);
            return Ok(CheckOutcome::NoSeats);
        }

        info!("THERE ARE OPEN SEATS for {}!", course.name);

        let webhook_url = match &self.config.webhook_url {
            Some(url) => url,
            None => {
                info!("WEBHOOK_URL not set, skipping webhook trigger.");
                return Ok(CheckOutcome::OpenSeats { seats, notified: false });
            }
        };

        self.fire_webhook(webhook_url).await?;
        info!("Webhook fired successfully for {}", course.name);
        Ok(CheckOutcome::OpenSeats { seats, notified: true })
    }

    // the webhook url carries the trigger key, so it is kept out of error text
    async fn fire_webhook(&self, webhook_url: &str) -> Result<(), CheckError> {
        info!("Triggering webhook (no payload)...");
        let response = self.client.post(webhook_url)
            .send().await
            .map_err(|e| CheckError::Transport(e.without_url()))?;

        let status = response.status();
        let body = response.text().await
            .map_err(|e| CheckError::Transport(e.without_url()))?;
        info!("Webhook HTTP status: {}", status);
        info!("Webhook response body: {}", body);

        if !status.is_success() {
            return Err(CheckError::HttpStatus { endpoint: String::from("webhook"), status });
        }
        Ok(())
    }

}

fn ensure_success(response: Response, endpoint: &str) -> Result<Response, CheckError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CheckError::HttpStatus { endpoint: endpoint.to_string(), status })
    }
}
