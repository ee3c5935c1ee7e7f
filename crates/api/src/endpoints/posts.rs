//! Post listing, detail, create and edit endpoints.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use gazette_common::{AppError, AppResult, Paginated};
use gazette_core::{CreatePostInput, EditOutcome, ImageUpload, UpdatePostInput};
use gazette_db::entities::{group, post, user};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{
        CommentView, GroupView, PostFormValues, PostFormView, PostView, UserView,
        form_field_error, json_body, post_views,
    },
};

/// Listing page query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Raw requested page; invalid values fail over per the pagination rules.
    pub page: Option<String>,
}

/// Batch-fetch the authors and groups referenced by a page of posts.
pub async fn fetch_relations(
    state: &AppState,
    posts: &[post::Model],
) -> AppResult<(HashMap<String, user::Model>, HashMap<String, group::Model>)> {
    let mut author_ids: Vec<String> = posts.iter().map(|p| p.author_id.clone()).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut group_ids: Vec<String> = posts.iter().filter_map(|p| p.group_id.clone()).collect();
    group_ids.sort_unstable();
    group_ids.dedup();

    let users = state
        .user_service
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let groups = state
        .group_service
        .find_by_ids(&group_ids)
        .await?
        .into_iter()
        .map(|g| (g.id.clone(), g))
        .collect();

    Ok((users, groups))
}

/// Render a page of posts into views.
pub async fn render_page(
    state: &AppState,
    page: Paginated<post::Model>,
) -> AppResult<Paginated<PostView>> {
    let (users, groups) = fetch_relations(state, &page.items).await?;
    let views = post_views(&page.items, &users, &groups, state.storage.as_ref());
    Ok(Paginated::new(views, page.meta))
}

/// All-posts listing, served through the page cache.
async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> AppResult<Response> {
    let cache_key = format!("index:{}", query.page.as_deref().unwrap_or("1"));

    if state.cache_enabled
        && let Some(cached) = state.page_cache.get(&cache_key)
    {
        return Ok(json_body(cached));
    }

    let page = state.post_service.list_page(query.page.as_deref()).await?;
    let view = render_page(&state, page).await?;
    let payload =
        serde_json::to_string(&view).map_err(|e| AppError::Internal(e.to_string()))?;

    if state.cache_enabled {
        state.page_cache.put(&cache_key, payload.clone());
    }

    Ok(json_body(payload))
}

/// Group listing response.
#[derive(Debug, Serialize)]
pub struct GroupPageResponse {
    pub group: GroupView,
    pub posts: Paginated<PostView>,
}

/// One group's posts.
async fn group_list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<GroupPageResponse>> {
    let group = state.group_service.get_by_slug(&slug).await?;
    let page = state
        .post_service
        .list_group_page(&group.id, query.page.as_deref())
        .await?;
    let posts = render_page(&state, page).await?;

    Ok(Json(GroupPageResponse {
        group: (&group).into(),
        posts,
    }))
}

/// Profile listing response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub author: UserView,
    /// Whether the viewer follows this author; always false for anonymous
    /// viewers.
    pub following: bool,
    pub posts: Paginated<PostView>,
}

/// One author's posts plus follow status.
async fn profile(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ProfileResponse>> {
    let author = state.user_service.get_by_username(&username).await?;
    let page = state
        .post_service
        .list_author_page(&author.id, query.page.as_deref())
        .await?;
    let posts = render_page(&state, page).await?;

    // Anonymous viewers never hit the follow table.
    let following = match viewer {
        Some(ref v) => state.follow_service.is_following(&v.id, &author.id).await?,
        None => false,
    };

    Ok(Json(ProfileResponse {
        author: (&author).into(),
        following,
        posts,
    }))
}

/// Empty comment form context, offered to authenticated viewers.
#[derive(Debug, Serialize)]
pub struct CommentFormValues {
    pub text: String,
}

/// Post detail response.
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub comment_form: Option<CommentFormValues>,
}

/// One post with its comments and an inline comment form.
async fn detail(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostDetailResponse>> {
    let post = state.post_service.get(&id).await?;
    let comments = state.comment_service.list_for_post(&post.id).await?;

    // One relation fetch covers the post author and every commenter.
    let mut user_ids: Vec<String> = comments.iter().map(|c| c.author_id.clone()).collect();
    user_ids.push(post.author_id.clone());
    user_ids.sort_unstable();
    user_ids.dedup();

    let users: HashMap<String, user::Model> = state
        .user_service
        .find_by_ids(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let author = users
        .get(&post.author_id)
        .ok_or_else(|| AppError::Internal("post author missing".to_string()))?;

    let group = match post.group_id.as_deref() {
        Some(group_id) => state
            .group_service
            .find_by_ids(&[group_id.to_string()])
            .await?
            .into_iter()
            .next(),
        None => None,
    };

    let comment_views = comments
        .iter()
        .filter_map(|c| users.get(&c.author_id).map(|u| CommentView::build(c, u)))
        .collect();

    Ok(Json(PostDetailResponse {
        post: PostView::build(&post, author, group.as_ref(), state.storage.as_ref()),
        comments: comment_views,
        comment_form: viewer.map(|_| CommentFormValues {
            text: String::new(),
        }),
    }))
}

/// Parsed multipart post form.
struct PostFormData {
    text: String,
    group: Option<String>,
    image: Option<ImageUpload>,
}

impl PostFormData {
    fn values(&self) -> PostFormValues {
        PostFormValues {
            text: self.text.clone(),
            group: self.group.clone(),
        }
    }
}

/// Read the multipart post form (`text`, `group`, `image`).
async fn read_post_form(mut multipart: Multipart) -> AppResult<PostFormData> {
    let mut form = PostFormData {
        text: String::new(),
        group: None,
        image: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("text") => {
                form.text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("group") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !value.is_empty() {
                    form.group = Some(value);
                }
            }
            Some("image") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !filename.is_empty() && !data.is_empty() {
                    form.image = Some(ImageUpload {
                        filename,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Re-render the form on a field-level failure; propagate everything else.
fn form_error_or(err: AppError, values: PostFormValues, is_edit: bool) -> AppResult<Response> {
    match form_field_error(&err) {
        Some((field, message)) => Ok(Json(PostFormView::with_error(
            values, &field, &message, is_edit,
        ))
        .into_response()),
        None => Err(err),
    }
}

/// Empty create-post form.
async fn create_form(AuthUser(_user): AuthUser) -> Json<PostFormView> {
    Json(PostFormView::blank())
}

/// Create a post; on success, redirect to the author's profile.
async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = read_post_form(multipart).await?;
    let values = form.values();

    let input = CreatePostInput {
        text: form.text,
        group_id: form.group,
        image: form.image,
    };

    match state.post_service.create(&user.id, input).await {
        Ok(_post) => Ok(Redirect::to(&format!("/profile/{}", user.username)).into_response()),
        Err(err) => form_error_or(err, values, false),
    }
}

/// Pre-filled edit form; non-authors are bounced to the detail page.
async fn edit_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let post = state.post_service.get(&id).await?;

    if post.author_id != user.id {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    Ok(Json(PostFormView::filled(
        PostFormValues {
            text: post.text,
            group: post.group_id,
        },
        true,
    ))
    .into_response())
}

/// Apply an edit; both success and the silent non-author deny redirect to
/// the detail page.
async fn edit_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = read_post_form(multipart).await?;
    let values = form.values();

    let input = UpdatePostInput {
        text: form.text,
        group_id: form.group,
        image: form.image,
    };

    match state.post_service.update(&user.id, &id, input).await {
        Ok(EditOutcome::Updated(_) | EditOutcome::NotAuthor) => {
            Ok(Redirect::to(&format!("/posts/{id}")).into_response())
        }
        Err(err) => form_error_or(err, values, true),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/group/{slug}", get(group_list))
        .route("/profile/{username}", get(profile))
        .route("/posts/{id}", get(detail))
        .route("/create", get(create_form).post(create_post))
        .route("/posts/{id}/edit", get(edit_form).post(edit_post))
}
