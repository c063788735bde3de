//! In-memory repositories used for local development and tests
//!
//! Records are kept in insertion order, so "newest first" is simply reverse
//! iteration. Read models resolve authors and categories through the other
//! repositories; a post or comment whose author or category cannot be
//! resolved is left out, like an inner join.

use std::sync::Arc;

use async_trait::async_trait;
use blog_auth::repositories::UserRepository;
use blog_common::{DatabaseError, DatabaseResult};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryRepository, CommentRepository, PostRepository};
use crate::models::{
    AuthorSummary, Category, CategorySummary, Comment, CommentView, NewComment, NewPost,
    PageRequest, Post, PostFilter, PostView, UpdatePost,
};

/// Post repository held in process memory
#[derive(Clone)]
pub struct InMemoryPostRepository {
    posts: Arc<RwLock<Vec<Post>>>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl InMemoryPostRepository {
    pub fn new(users: Arc<dyn UserRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            posts: Arc::default(),
            users,
            categories,
        }
    }

    async fn view_of(&self, post: Post) -> DatabaseResult<Option<PostView>> {
        let Some(author) = self.users.find_by_id(post.author_id).await? else {
            return Ok(None);
        };
        let Some(category) = self.categories.find_by_id(post.category_id).await? else {
            return Ok(None);
        };

        Ok(Some(PostView {
            post,
            author: AuthorSummary {
                id: author.id,
                name: author.name,
                email: Some(author.email),
            },
            category: CategorySummary {
                id: category.id,
                name: category.name,
            },
        }))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: &NewPost) -> DatabaseResult<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title.clone(),
            content: new_post.content.clone(),
            featured_image: new_post.featured_image.clone(),
            author_id: new_post.author_id,
            category_id: new_post.category_id,
            created_at: now,
            updated_at: now,
        };

        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_view_by_id(&self, id: Uuid) -> DatabaseResult<Option<PostView>> {
        match self.find_by_id(id).await? {
            Some(post) => self.view_of(post).await,
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: &PageRequest,
    ) -> DatabaseResult<(Vec<PostView>, i64)> {
        let matching: Vec<Post> = {
            let posts = self.posts.read().await;
            posts
                .iter()
                .rev()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect()
        };

        let mut views = Vec::with_capacity(matching.len());
        for post in matching {
            if let Some(view) = self.view_of(post).await? {
                views.push(view);
            }
        }

        let total = views.len() as i64;
        let items = views
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();

        Ok((items, total))
    }

    async fn update(&self, id: Uuid, changes: &UpdatePost) -> DatabaseResult<Option<Post>> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            post.title = title.clone();
        }
        if let Some(content) = &changes.content {
            post.content = content.clone();
        }
        if let Some(featured_image) = &changes.featured_image {
            post.featured_image = featured_image.clone();
        }
        if let Some(category_id) = changes.category_id {
            post.category_id = category_id;
        }
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }
}

/// Comment repository held in process memory
#[derive(Clone)]
pub struct InMemoryCommentRepository {
    comments: Arc<RwLock<Vec<Comment>>>,
    users: Arc<dyn UserRepository>,
}

impl InMemoryCommentRepository {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            comments: Arc::default(),
            users,
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, new_comment: &NewComment) -> DatabaseResult<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            content: new_comment.content.clone(),
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            created_at: now,
            updated_at: now,
        };

        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Comment>> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> DatabaseResult<Vec<CommentView>> {
        let on_post: Vec<Comment> = {
            let comments = self.comments.read().await;
            comments
                .iter()
                .rev()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect()
        };

        let mut views = Vec::with_capacity(on_post.len());
        for comment in on_post {
            if let Some(author) = self.users.find_by_id(comment.author_id).await? {
                views.push(CommentView {
                    comment,
                    author: AuthorSummary {
                        id: author.id,
                        name: author.name,
                        email: None,
                    },
                });
            }
        }

        Ok(views)
    }

    async fn update_content(&self, id: Uuid, content: &str) -> DatabaseResult<Option<Comment>> {
        let mut comments = self.comments.write().await;
        let Some(comment) = comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() < before)
    }

    async fn delete_for_post(&self, post_id: Uuid) -> DatabaseResult<u64> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| c.post_id != post_id);
        Ok((before - comments.len()) as u64)
    }
}

/// Category repository held in process memory
#[derive(Clone, Default)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<Vec<Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, name: &str) -> DatabaseResult<Category> {
        let mut categories = self.categories.write().await;

        if categories.iter().any(|c| c.name == name) {
            return Err(DatabaseError::UniqueViolation(
                "categories_name_key".to_string(),
            ));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());

        Ok(category)
    }

    async fn list(&self) -> DatabaseResult<Vec<Category>> {
        let mut categories = self.categories.read().await.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_auth::{models::NewUser, repositories::InMemoryUserRepository};

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        categories: Arc<InMemoryCategoryRepository>,
        posts: InMemoryPostRepository,
        comments: InMemoryCommentRepository,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let categories = Arc::new(InMemoryCategoryRepository::new());
        Fixture {
            posts: InMemoryPostRepository::new(users.clone(), categories.clone()),
            comments: InMemoryCommentRepository::new(users.clone()),
            users,
            categories,
        }
    }

    async fn user(fixture: &Fixture, name: &str) -> Uuid {
        fixture
            .users
            .create(&NewUser {
                name: name.to_string(),
                email: format!("{}@x.com", name.to_lowercase()),
                password_hash: "$argon2id$stub".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn new_post(title: &str, author_id: Uuid, category_id: Uuid) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "some body text".to_string(),
            featured_image: "placeholder.jpg".to_string(),
            author_id,
            category_id,
        }
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_paged() {
        let fx = fixture();
        let alice = user(&fx, "Alice").await;
        let category = fx.categories.create("Rust").await.unwrap().id;
        for i in 1..=5 {
            fx.posts
                .create(&new_post(&format!("post {}", i), alice, category))
                .await
                .unwrap();
        }

        let (first, total) = fx
            .posts
            .list(&PostFilter::default(), &PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(total, 5);
        let titles: Vec<_> = first.iter().map(|v| v.post.title.as_str()).collect();
        assert_eq!(titles, ["post 5", "post 4"]);

        let (last, _) = fx
            .posts
            .list(&PostFilter::default(), &PageRequest::new(Some(3), Some(2)))
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].post.title, "post 1");

        let (beyond, total) = fx
            .posts
            .list(&PostFilter::default(), &PageRequest::new(Some(9), Some(2)))
            .await
            .unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn views_carry_author_and_category() {
        let fx = fixture();
        let alice = user(&fx, "Alice").await;
        let category = fx.categories.create("Rust").await.unwrap().id;
        let post = fx
            .posts
            .create(&new_post("Ownership", alice, category))
            .await
            .unwrap();

        let view = fx.posts.find_view_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(view.author.name, "Alice");
        assert_eq!(view.author.email.as_deref(), Some("alice@x.com"));
        assert_eq!(view.category.name, "Rust");

        let dangling = fx
            .posts
            .create(&new_post("Orphan", alice, Uuid::new_v4()))
            .await
            .unwrap();
        assert!(fx.posts.find_view_by_id(dangling.id).await.unwrap().is_none());
        assert!(fx.posts.find_view_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_keeps_the_author() {
        let fx = fixture();
        let alice = user(&fx, "Alice").await;
        let post = fx
            .posts
            .create(&new_post("original", alice, Uuid::new_v4()))
            .await
            .unwrap();

        let updated = fx
            .posts
            .update(
                post.id,
                &UpdatePost {
                    title: Some("renamed".to_string()),
                    ..UpdatePost::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, post.content);
        assert_eq!(updated.author_id, post.author_id);
        assert!(
            fx.posts
                .update(Uuid::new_v4(), &UpdatePost::default())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn comments_list_with_author_names() {
        let fx = fixture();
        let bob = user(&fx, "Bob").await;
        let post_id = Uuid::new_v4();
        let other_post = Uuid::new_v4();
        for target in [post_id, post_id, other_post] {
            fx.comments
                .create(&NewComment {
                    content: "hello".to_string(),
                    post_id: target,
                    author_id: bob,
                })
                .await
                .unwrap();
        }

        let listed = fx.comments.list_for_post(post_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|c| c.author.name == "Bob" && c.author.email.is_none()));

        assert_eq!(fx.comments.delete_for_post(post_id).await.unwrap(), 2);
        assert!(fx.comments.list_for_post(post_id).await.unwrap().is_empty());
        assert_eq!(fx.comments.list_for_post(other_post).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn category_names_are_unique() {
        let repo = InMemoryCategoryRepository::new();
        repo.create("Rust").await.unwrap();
        repo.create("Go").await.unwrap();

        let err = repo.create("Rust").await.unwrap_err();
        assert!(err.is_unique_violation());

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Go", "Rust"]);
    }
}
