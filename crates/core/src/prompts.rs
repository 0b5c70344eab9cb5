use chrono::NaiveDate;

use crate::models::TripRequest;

/// Substituted for the draft when the generation call fails; the pipeline keeps
/// going with this text rather than aborting.
pub const DRAFT_FALLBACK: &str = "Sorry, I couldn't generate an itinerary at this time.";

pub const SUGGESTIONS_FALLBACK: &str = "Sorry, I couldn't generate suggestions at this time.";

/// Budget unit embedded in the optimizer prompt. Fixed, not validated.
pub const BUDGET_CURRENCY: &str = "INR";

/// First generation request: a creative but concise single-day plan built from
/// the raw trip parameters.
pub fn draft_prompt(
    destination: &str,
    interests: &[String],
    starting_point: &str,
    date: NaiveDate,
) -> String {
    format!(
        "Given the following details about a trip to {destination}, generate a creative and \
         detailed itinerary. The user is interested in activities like {interests}. The tour \
         starts from {starting_point} on {date}. Suggest activities such as sightseeing, food, \
         and transportation. Keep it concise, just the details, and provide no section headers.",
        interests = interests.join(", "),
        date = date.format("%Y-%m-%d"),
    )
}

/// Second generation request: refine the drafted itinerary so it fits the
/// stated budget and time window.
pub fn optimize_prompt(itinerary: &str, request: &TripRequest) -> String {
    format!(
        "You are an expert travel planner specializing in single-day itineraries. Optimize the \
         provided itinerary so it fits within the user's constraints for the specified date.\n\
         Details:\n\
         - Itinerary: {itinerary}\n\
         - Date: {date}\n\
         - Budget: {currency} {budget}\n\
         - Start Time: {start}\n\
         - End Time: {end}\n\
         - Total available time: {hours} hours",
        date = request.date.format("%Y-%m-%d"),
        currency = BUDGET_CURRENCY,
        budget = request.budget,
        start = request.start_time.format("%H:%M"),
        end = request.end_time.format("%H:%M"),
        hours = request.available_hours(),
    )
}

/// One-shot request for short activity names in a city, capped by the caller.
pub fn suggestions_prompt(city: &str) -> String {
    format!(
        "Provide a list of up to 5 activities in {city} for travelers interested in food, \
         adventure, culture, and local experiences. Each activity should be a short, catchy \
         name, one per line.",
    )
}
