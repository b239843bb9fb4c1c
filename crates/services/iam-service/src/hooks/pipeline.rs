//! Hook composition.

use std::sync::Arc;

use sea_orm::ActiveModelTrait;

use common::AppResult;
use domain::RequestContext;

use super::mutation::{ModelOf, Mutation, MutationOutcome, Mutator};

/// Wraps the next stage of the chain into a new stage.
pub type Hook<A> = Box<dyn Fn(Arc<dyn Mutator<A>>) -> Arc<dyn Mutator<A>> + Send + Sync>;

/// An entity's full write path: its hooks around a terminal stage.
pub struct Pipeline<A>
where
    A: ActiveModelTrait + Send + 'static,
{
    head: Arc<dyn Mutator<A>>,
}

impl<A> Clone for Pipeline<A>
where
    A: ActiveModelTrait + Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            head: Arc::clone(&self.head),
        }
    }
}

impl<A> Pipeline<A>
where
    A: ActiveModelTrait + Send + 'static,
{
    /// Build the chain. Hooks run in the order given; the terminal runs last.
    pub fn new(terminal: Arc<dyn Mutator<A>>, hooks: Vec<Hook<A>>) -> Self {
        let head = hooks
            .into_iter()
            .rev()
            .fold(terminal, |next, hook| hook(next));
        Self { head }
    }

    pub async fn run(
        &self,
        ctx: &RequestContext,
        mutation: Mutation<A>,
    ) -> AppResult<MutationOutcome<ModelOf<A>>> {
        self.head.mutate(ctx, mutation).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use sea_orm::Set;

    use super::*;
    use crate::repository::entities::brand;

    type Log = Arc<Mutex<Vec<&'static str>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        next: Option<Arc<dyn Mutator<brand::ActiveModel>>>,
    }

    #[async_trait]
    impl Mutator<brand::ActiveModel> for Recorder {
        async fn mutate(
            &self,
            ctx: &RequestContext,
            mutation: Mutation<brand::ActiveModel>,
        ) -> AppResult<MutationOutcome<brand::Model>> {
            self.log.lock().unwrap().push(self.name);
            match &self.next {
                Some(next) => next.mutate(ctx, mutation).await,
                None => Ok(MutationOutcome::Affected(0)),
            }
        }
    }

    fn recording_hook(name: &'static str, log: &Log) -> Hook<brand::ActiveModel> {
        let log = log.clone();
        Box::new(move |next| -> Arc<dyn Mutator<brand::ActiveModel>> {
            Arc::new(Recorder {
                name,
                log: log.clone(),
                next: Some(next),
            })
        })
    }

    fn brand_named(name: &str) -> brand::ActiveModel {
        brand::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_hooks_run_in_declared_order() {
        let log: Log = Arc::default();
        let terminal = Arc::new(Recorder {
            name: "persist",
            log: log.clone(),
            next: None,
        });
        let pipeline = Pipeline::new(
            terminal,
            vec![
                recording_hook("tenant", &log),
                recording_hook("policy", &log),
                recording_hook("audit", &log),
            ],
        );

        pipeline
            .run(&RequestContext::system(), Mutation::create(brand_named("A")))
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["tenant", "policy", "audit", "persist"]);
    }

    #[tokio::test]
    async fn test_no_hooks_reaches_terminal_directly() {
        let log: Log = Arc::default();
        let terminal = Arc::new(Recorder {
            name: "persist",
            log: log.clone(),
            next: None,
        });
        let pipeline = Pipeline::new(terminal, Vec::new());

        let outcome = pipeline
            .run(&RequestContext::system(), Mutation::create(brand_named("A")))
            .await
            .unwrap();

        assert_eq!(outcome.rows_affected(), 0);
        assert_eq!(*log.lock().unwrap(), vec!["persist"]);
    }
}
