use actix_web::{web, HttpResponse, ResponseError};

use mongodb::bson::oid::ObjectId;

use crate::database::UserRepository;
use crate::models::{
    FollowRequest, MessageResponse, UnfollowRequest, UpdateUserRequest, UserResponse,
};
use crate::utils::{parse_object_id, AppError};

/// Mounts the user endpoints under /api/users
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("", web::get().to(get_all_users))
            .route("/{id}", web::get().to(user_info))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::patch().to(update_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/follow", web::post().to(follow))
            .route("/{id}/unfollow", web::post().to(unfollow)),
    );
}

/// Read endpoints report database faults under "error" instead of "message"
fn read_failure(err: AppError) -> HttpResponse {
    match err {
        AppError::DatabaseError(msg) => {
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": msg }))
        }
        other => other.error_response(),
    }
}

/// GET /api/users - Lists every user, without passwords
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 500, description = "Database error")
    )
)]
pub async fn get_all_users(repo: web::Data<dyn UserRepository>) -> HttpResponse {
    match repo.list_users().await {
        Ok(users) => {
            log::info!("📋 GET /users - {} users", users.len());
            let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(body)
        }
        Err(e) => {
            log::error!("❌ Error listing users: {}", e);
            read_failure(e)
        }
    }
}

/// GET /api/users/{id} - Single user profile
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Database error")
    )
)]
pub async fn user_info(repo: web::Data<dyn UserRepository>, path: web::Path<String>) -> HttpResponse {
    let raw_id = path.into_inner();
    log::info!("🔍 GET /users/{}", raw_id);

    let id = match parse_object_id(&raw_id) {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match repo.find_user(id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserResponse::from(user)),
        Ok(None) => AppError::NotFound.error_response(),
        Err(e) => {
            log::error!("❌ Error fetching user {}: {}", id, e);
            read_failure(e)
        }
    }
}

/// PUT|PATCH /api/users/{id} - Sets the bio, creating the user if it doesn't exist
///
/// A missing or non-JSON body counts as `{}`: the user is still upserted.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated (or newly created) user", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Database error", body = MessageResponse)
    )
)]
pub async fn update_user(
    repo: web::Data<dyn UserRepository>,
    path: web::Path<String>,
    request: Option<web::Json<UpdateUserRequest>>,
) -> HttpResponse {
    let id = match parse_object_id(&path) {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    log::info!("🔧 PUT /users/{} - Updating bio", id);

    match repo.upsert_bio(id, request.bio).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserResponse::from(user)),
        Ok(None) => AppError::NotFound.error_response(),
        Err(e) => {
            log::error!("❌ Error updating user {}: {}", id, e);
            e.error_response()
        }
    }
}

/// DELETE /api/users/{id} - Removes the user document
///
/// References to the user in other users' following/followers sets are left as they are.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Database error", body = MessageResponse)
    )
)]
pub async fn delete_user(repo: web::Data<dyn UserRepository>, path: web::Path<String>) -> HttpResponse {
    let id = match parse_object_id(&path) {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };
    log::info!("🗑️  DELETE /users/{}", id);

    match repo.delete_user(id).await {
        Ok(true) => HttpResponse::Ok().json(MessageResponse {
            message: "Successfully deleted.".to_string(),
        }),
        Ok(false) => AppError::NotFound.error_response(),
        Err(e) => {
            log::error!("❌ Error deleting user {}: {}", id, e);
            e.error_response()
        }
    }
}

/// Parses the path id and the body id; either one being bad reports the path id
fn parse_pair(raw_id: String, raw_target: Option<String>) -> Result<(ObjectId, ObjectId), AppError> {
    let raw_target = raw_target.unwrap_or_default();
    match (parse_object_id(&raw_id), parse_object_id(&raw_target)) {
        (Ok(id), Ok(target)) => Ok((id, target)),
        _ => Err(AppError::InvalidId(raw_id)),
    }
}

/// POST /api/users/{id}/follow - `id` starts following `idToFollow`
///
/// Both sides are upserted, so either user is created if missing. The two
/// writes are independent: if the second fails the first is not undone.
#[utoipa::path(
    post,
    path = "/api/users/{id}/follow",
    tag = "Users",
    params(("id" = String, Path, description = "Follower ObjectId")),
    request_body = FollowRequest,
    responses(
        (status = 201, description = "Follower after the update", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Database error", body = MessageResponse)
    )
)]
pub async fn follow(
    repo: web::Data<dyn UserRepository>,
    path: web::Path<String>,
    request: Option<web::Json<FollowRequest>>,
) -> HttpResponse {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let (id, target) = match parse_pair(path.into_inner(), request.id_to_follow) {
        Ok(pair) => pair,
        Err(e) => return e.error_response(),
    };

    log::info!("➕ POST /users/{}/follow - {}", id, target);

    let user = match repo.add_following(id, target).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("❌ Error adding {} to {}'s following: {}", target, id, e);
            return e.error_response();
        }
    };

    // The followee's updated document isn't part of the response
    if let Err(e) = repo.add_follower(target, id).await {
        log::warn!(
            "⚠️  {} now follows {} but updating {}'s followers failed: {}",
            id, target, target, e
        );
        return e.error_response();
    }

    match user {
        Some(user) => HttpResponse::Created().json(UserResponse::from(user)),
        None => AppError::NotFound.error_response(),
    }
}

/// POST /api/users/{id}/unfollow - `id` stops following `idToUnfollow`
///
/// Upserts both sides like `follow` does, so unfollowing from an unknown
/// user creates it with empty sets.
#[utoipa::path(
    post,
    path = "/api/users/{id}/unfollow",
    tag = "Users",
    params(("id" = String, Path, description = "Follower ObjectId")),
    request_body = UnfollowRequest,
    responses(
        (status = 200, description = "Follower after the update", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Database error", body = MessageResponse)
    )
)]
pub async fn unfollow(
    repo: web::Data<dyn UserRepository>,
    path: web::Path<String>,
    request: Option<web::Json<UnfollowRequest>>,
) -> HttpResponse {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let (id, target) = match parse_pair(path.into_inner(), request.id_to_unfollow) {
        Ok(pair) => pair,
        Err(e) => return e.error_response(),
    };

    log::info!("➖ POST /users/{}/unfollow - {}", id, target);

    let user = match repo.remove_following(id, target).await {
        Ok(Some(user)) => user,
        Ok(None) => return AppError::NotFound.error_response(),
        Err(e) => {
            log::error!("❌ Error removing {} from {}'s following: {}", target, id, e);
            return e.error_response();
        }
    };

    match repo.remove_follower(target, id).await {
        Ok(Some(_)) => {}
        Ok(None) => log::debug!("🔍 {} was not returned after removing {} from its followers", target, id),
        Err(e) => {
            log::warn!(
                "⚠️  {} unfollowed {} but updating {}'s followers failed: {}",
                id, target, target, e
            );
            return e.error_response();
        }
    }

    HttpResponse::Ok().json(UserResponse::from(user))
}
