use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "User profiles and follow relationships for the social network.\n\n**Note:** ids are MongoDB ObjectIds (24 hex characters). Updating or following an unknown id creates the user."
    ),
    paths(
        // Users
        crate::api::users::get_all_users,
        crate::api::users::user_info,
        crate::api::users::update_user,
        crate::api::users::delete_user,
        crate::api::users::follow,
        crate::api::users::unfollow,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserResponse,
            crate::models::UpdateUserRequest,
            crate::models::FollowRequest,
            crate::models::UnfollowRequest,
            crate::models::MessageResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User profile CRUD and follow/unfollow."),
        (name = "Health", description = "Health check and request metrics."),
    )
)]
pub struct ApiDoc;
