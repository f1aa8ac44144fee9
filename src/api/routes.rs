//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    ApplicationFilter, ApplicationPayload, Category, CategoryDraft, Event, EventChanges,
    EventDraft, EventFilter, Faq, FaqDraft, FaqFilter, FaqType, OperationContext, PageRequest,
    VolunteerApplication,
};
use crate::error::AppError;
use crate::handlers::{
    CategoryHandler, EventHandler, FaqHandler, RegisterVolunteerCommand, RegistrationHandler,
    UpdateStatusCommand,
};
use crate::state::AppState;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::response::{ApiResponse, PaginatedResponse};

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub is_online: Option<bool>,
    #[serde(default)]
    pub is_publish: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub faq_type: Option<FaqType>,
    #[serde(default)]
    pub is_publish: Option<bool>,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;
type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;
type ListResult<T> = Result<Json<PaginatedResponse<T>>, AppError>;

fn page_request(
    state: &AppState,
    page: Option<u32>,
    limit: Option<u32>,
) -> Result<PageRequest, AppError> {
    Ok(PageRequest::new(page, limit, state.settings.max_page_limit)?)
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Event volunteers
        .route("/event-volunteers", get(list_event_volunteers))
        .route(
            "/event-volunteers/:id",
            post(register_volunteer)
                .get(list_event_volunteers_by_event)
                .delete(delete_event_volunteer),
        )
        .route("/event-volunteers/:id/status", put(update_event_volunteer_status))
        // Events
        .route("/events", get(list_events).post(create_event))
        .route("/events/slug/:slug", get(get_event_by_slug))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        // Categories
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        // FAQs
        .route("/faqs", get(list_faqs).post(create_faq))
        .route("/faqs/:id", get(get_faq).put(update_faq).delete(delete_faq))
}

// =========================================================================
// POST /event-volunteers/:event_id
// =========================================================================

/// Apply as a volunteer for an event
async fn register_volunteer(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ApplicationPayload>,
) -> CreatedResult<VolunteerApplication> {
    let handler = RegistrationHandler::new(&state);
    let command = RegisterVolunteerCommand::new(event_id, context.caller.id(), payload);

    let application = handler.register(command, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(application, "Success create eventVolunteer")),
    ))
}

// =========================================================================
// GET /event-volunteers/:event_id
// =========================================================================

/// Applications for one event
async fn list_event_volunteers_by_event(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Vec<VolunteerApplication>> {
    let applications = RegistrationHandler::new(&state)
        .list_for_event(event_id, &context)
        .await?;

    Ok(Json(ApiResponse::success(applications, "Success get eventVolunteer")))
}

// =========================================================================
// GET /event-volunteers
// =========================================================================

/// Paginated applications with optional eventId/userId filters
async fn list_event_volunteers(
    State(state): State<AppState>,
    context: OperationContext,
    ApiQuery(query): ApiQuery<VolunteerListQuery>,
) -> ListResult<VolunteerApplication> {
    let page = page_request(&state, query.page, query.limit)?;
    let filter = ApplicationFilter {
        event_id: query.event_id,
        user_id: query.user_id,
    };

    let result = RegistrationHandler::new(&state)
        .list(filter, page, &context)
        .await?;

    Ok(Json(PaginatedResponse::from_page(result, "Success get eventVolunteers")))
}

// =========================================================================
// PUT /event-volunteers/:application_id/status
// =========================================================================

/// Review an application
async fn update_event_volunteer_status(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(application_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> ApiResult<VolunteerApplication> {
    let command = UpdateStatusCommand::new(application_id, request.status);
    let application = RegistrationHandler::new(&state)
        .update_status(command, &context)
        .await?;

    Ok(Json(ApiResponse::success(application, "Success update eventVolunteer")))
}

// =========================================================================
// DELETE /event-volunteers/:application_id
// =========================================================================

/// Delete an application and free its roster seat
async fn delete_event_volunteer(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(application_id): ApiPath<Uuid>,
) -> ApiResult<VolunteerApplication> {
    let application = RegistrationHandler::new(&state)
        .unregister(application_id, &context)
        .await?;

    Ok(Json(ApiResponse::success(application, "Success delete eventVolunteer")))
}

// =========================================================================
// Events
// =========================================================================

async fn create_event(
    State(state): State<AppState>,
    context: OperationContext,
    ApiJson(draft): ApiJson<EventDraft>,
) -> CreatedResult<Event> {
    let event = EventHandler::new(&state).create(draft, &context).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(event, "Success create event"))))
}

async fn list_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventListQuery>,
) -> ListResult<Event> {
    let page = page_request(&state, query.page, query.limit)?;
    let filter = EventFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        category: query.category,
        is_online: query.is_online,
        is_publish: query.is_publish,
    };

    let result = EventHandler::new(&state).list(&filter, page).await?;

    Ok(Json(PaginatedResponse::from_page(result, "Success get all events")))
}

async fn get_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Event> {
    let event = EventHandler::new(&state).get(event_id).await?;

    Ok(Json(ApiResponse::success(event, "Success get event by id")))
}

async fn get_event_by_slug(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Event> {
    let event = EventHandler::new(&state).get_by_slug(&slug).await?;

    Ok(Json(ApiResponse::success(event, "Success get event by slug")))
}

async fn update_event(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(changes): ApiJson<EventChanges>,
) -> ApiResult<Event> {
    let event = EventHandler::new(&state)
        .update(event_id, changes, &context)
        .await?;

    Ok(Json(ApiResponse::success(event, "Success update event")))
}

async fn delete_event(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(event_id): ApiPath<Uuid>,
) -> ApiResult<Event> {
    let event = EventHandler::new(&state).delete(event_id, &context).await?;

    Ok(Json(ApiResponse::success(event, "Success delete event")))
}

// =========================================================================
// Categories
// =========================================================================

async fn create_category(
    State(state): State<AppState>,
    context: OperationContext,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> CreatedResult<Category> {
    let category = CategoryHandler::new(&state).create(draft, &context).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(category, "Success create category")),
    ))
}

async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryListQuery>,
) -> ListResult<Category> {
    let page = page_request(&state, query.page, query.limit)?;
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

    let result = CategoryHandler::new(&state).list(search, page).await?;

    Ok(Json(PaginatedResponse::from_page(result, "Success get categories")))
}

async fn get_category(
    State(state): State<AppState>,
    ApiPath(category_id): ApiPath<Uuid>,
) -> ApiResult<Category> {
    let category = CategoryHandler::new(&state).get(category_id).await?;

    Ok(Json(ApiResponse::success(category, "Success get category")))
}

async fn update_category(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(category_id): ApiPath<Uuid>,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> ApiResult<Category> {
    let category = CategoryHandler::new(&state)
        .update(category_id, draft, &context)
        .await?;

    Ok(Json(ApiResponse::success(category, "Success update category")))
}

async fn delete_category(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(category_id): ApiPath<Uuid>,
) -> ApiResult<Category> {
    let category = CategoryHandler::new(&state)
        .delete(category_id, &context)
        .await?;

    Ok(Json(ApiResponse::success(category, "Success delete category")))
}

// =========================================================================
// FAQs
// =========================================================================

async fn create_faq(
    State(state): State<AppState>,
    context: OperationContext,
    ApiJson(draft): ApiJson<FaqDraft>,
) -> CreatedResult<Faq> {
    let faq = FaqHandler::new(&state).create(draft, &context).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(faq, "Success create faq"))))
}

async fn list_faqs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FaqListQuery>,
) -> ListResult<Faq> {
    let page = page_request(&state, query.page, query.limit)?;
    let filter = FaqFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        faq_type: query.faq_type,
        is_publish: query.is_publish,
    };

    let result = FaqHandler::new(&state).list(&filter, page).await?;

    Ok(Json(PaginatedResponse::from_page(result, "Success get faqs")))
}

async fn get_faq(
    State(state): State<AppState>,
    ApiPath(faq_id): ApiPath<Uuid>,
) -> ApiResult<Faq> {
    let faq = FaqHandler::new(&state).get(faq_id).await?;

    Ok(Json(ApiResponse::success(faq, "Success get faq by id")))
}

async fn update_faq(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(faq_id): ApiPath<Uuid>,
    ApiJson(draft): ApiJson<FaqDraft>,
) -> ApiResult<Faq> {
    let faq = FaqHandler::new(&state).update(faq_id, draft, &context).await?;

    Ok(Json(ApiResponse::success(faq, "Success update faq")))
}

async fn delete_faq(
    State(state): State<AppState>,
    context: OperationContext,
    ApiPath(faq_id): ApiPath<Uuid>,
) -> ApiResult<Faq> {
    let faq = FaqHandler::new(&state).delete(faq_id, &context).await?;

    Ok(Json(ApiResponse::success(faq, "Success delete faq")))
}
