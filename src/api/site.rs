//! Site-wide endpoints: settings, featured projects and the homepage aggregate.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{ContentItem, ContentQuery, ContentType, HomepageData, SiteSettings};
use crate::shape::shape_items;
use crate::AppState;

const HOMEPAGE_FEATURED_POSTS: u32 = 3;
const HOMEPAGE_RECENT_PROJECTS: u32 = 6;
/// The homepage shows a fixed slice of testimonials; the full set is at `/content/testimonial`.
const HOMEPAGE_TESTIMONIALS: u32 = 10;

/// GET /settings - The site settings.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<SiteSettings> {
    let options = state.repo.load_options().await?;
    success(options.settings(&state.config.site_url))
}

/// GET /featured-projects - Every project flagged as featured.
pub async fn featured_projects(State(state): State<AppState>) -> ApiResult<Vec<ContentItem>> {
    let page = state
        .repo
        .query_items(&ContentQuery::for_type(ContentType::Project).featured())
        .await?;
    success(shape_items(&state.repo, page.records).await?)
}

/// GET /homepage - Featured articles, recent projects, testimonials and the hero block.
pub async fn get_homepage(State(state): State<AppState>) -> ApiResult<HomepageData> {
    let repo = &state.repo;

    let featured_query = ContentQuery::for_type(ContentType::Article)
        .featured()
        .limit(HOMEPAGE_FEATURED_POSTS);
    let projects_query = ContentQuery::for_type(ContentType::Project).limit(HOMEPAGE_RECENT_PROJECTS);
    let testimonials_query =
        ContentQuery::for_type(ContentType::Testimonial).limit(HOMEPAGE_TESTIMONIALS);

    let (featured, projects, testimonials, options) = tokio::try_join!(
        repo.query_items(&featured_query),
        repo.query_items(&projects_query),
        repo.query_items(&testimonials_query),
        repo.load_options(),
    )?;

    let (featured_posts, recent_projects, testimonials) = tokio::try_join!(
        shape_items(repo, featured.records),
        shape_items(repo, projects.records),
        shape_items(repo, testimonials.records),
    )?;

    success(HomepageData {
        featured_posts,
        recent_projects,
        testimonials,
        hero_section: options.hero(),
    })
}
