//! Plan configuration from YAML
//!
//! A plan describes a chain over JSON values: an optional seed followed by a
//! list of steps, each mapped onto one chain combinator.

use crate::core::{
    error::ChainError,
    pipeline::Chain,
    step::{task, Next, Task},
};
use crate::execution::scheduler;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Top-level plan configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Plan name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Value forwarded to the first step (null when absent)
    #[serde(default)]
    pub seed: Option<Value>,

    /// Latency applied to items and tasks that don't set their own
    #[serde(default)]
    pub default_delay_ms: Option<u64>,

    /// Plan steps, in execution order
    pub steps: Vec<PlanStep>,
}

/// A single plan step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanStep {
    /// Iterate one item at a time
    Each(IterationConfig),

    /// Iterate with every item in flight at once
    EachParallel(IterationConfig),

    /// Pause, forwarding the value unchanged
    Wait { ms: u64 },

    /// Run a list or mapping of tasks concurrently
    Parallel { tasks: TaskSet },

    /// Replace the forwarded value
    Set { value: Value },

    /// Fail the chain
    Fail { message: String },
}

/// Per-item behaviour of an iteration step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationConfig {
    /// Output template; `{key}` and `{value}` are substituted
    #[serde(default = "default_template")]
    pub template: String,

    /// Per-item latency (overrides the plan default)
    #[serde(default)]
    pub delay_ms: Option<u64>,

    /// Fail the item whose rendered output equals this
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Collection to iterate instead of the forwarded value
    #[serde(default)]
    pub collection: Option<Value>,
}

fn default_template() -> String {
    "{value}".to_string()
}

/// Tasks of a parallel step; the result keeps the same shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskSet {
    List(Vec<TaskConfig>),
    Named(IndexMap<String, TaskConfig>),
}

/// A single parallel task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Value the task completes with
    #[serde(default)]
    pub value: Value,

    /// Task latency (overrides the plan default)
    #[serde(default)]
    pub delay_ms: Option<u64>,

    /// Fail with this message instead of completing
    #[serde(default)]
    pub fail: Option<String>,
}

impl PlanStep {
    /// Short name used in summaries
    pub fn kind(&self) -> &'static str {
        match self {
            PlanStep::Each(_) => "each",
            PlanStep::EachParallel(_) => "each_parallel",
            PlanStep::Wait { .. } => "wait",
            PlanStep::Parallel { .. } => "parallel",
            PlanStep::Set { .. } => "set",
            PlanStep::Fail { .. } => "fail",
        }
    }
}

impl PlanConfig {
    /// Load plan configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse plan configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PlanConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the plan configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Plan name cannot be empty");
        }

        for (index, step) in self.steps.iter().enumerate() {
            let position = index + 1;
            match step {
                PlanStep::Each(iteration) | PlanStep::EachParallel(iteration) => {
                    if iteration.template.is_empty() {
                        anyhow::bail!("Step {} ({}) has an empty template", position, step.kind());
                    }
                    if let Some(collection) = &iteration.collection {
                        if !matches!(collection, Value::Array(_) | Value::Object(_)) {
                            anyhow::bail!(
                                "Step {} ({}) collection must be an array or object, found {}",
                                position,
                                step.kind(),
                                kind_of(collection)
                            );
                        }
                    }
                }
                PlanStep::Parallel { tasks } => {
                    let empty_failure = match tasks {
                        TaskSet::List(list) => list.iter().any(TaskConfig::has_empty_failure),
                        TaskSet::Named(named) => named.values().any(TaskConfig::has_empty_failure),
                    };
                    if empty_failure {
                        anyhow::bail!("Step {} (parallel) has a task with an empty failure message", position);
                    }
                }
                PlanStep::Fail { message } => {
                    if message.is_empty() {
                        anyhow::bail!("Step {} (fail) has an empty message", position);
                    }
                }
                PlanStep::Wait { .. } | PlanStep::Set { .. } => {}
            }
        }

        Ok(())
    }

    /// Convert to a runnable chain
    pub fn to_chain(&self) -> Chain<Value> {
        let default_delay = self.default_delay_ms.unwrap_or(0);
        let mut chain = Chain::seeded(self.seed.clone().unwrap_or(Value::Null));

        for step in self.steps.iter().cloned() {
            chain = match step {
                PlanStep::Each(iteration) => iteration_step(chain, iteration, default_delay, false),
                PlanStep::EachParallel(iteration) => iteration_step(chain, iteration, default_delay, true),
                PlanStep::Wait { ms } => chain.wait(Duration::from_millis(ms)),
                PlanStep::Parallel { tasks } => parallel_step(chain, tasks, default_delay),
                PlanStep::Set { value } => chain.chain(move |_: Value, next: Next<Value>| next.done(value)),
                PlanStep::Fail { message } => chain.chain(move |_: Value, next: Next<Value>| next.fail(message)),
            };
        }

        chain
    }
}

impl TaskConfig {
    fn has_empty_failure(&self) -> bool {
        self.fail.as_deref().is_some_and(str::is_empty)
    }

    fn into_task(self, default_delay: u64) -> Task<Value, Value> {
        let delay = Duration::from_millis(self.delay_ms.unwrap_or(default_delay));
        let outcome = match self.fail {
            Some(message) => Err(ChainError::step(message)),
            None => Ok(self.value),
        };
        task(move |_: Value, next: Next<Value>| {
            scheduler::after(delay, move || next.complete(outcome));
        })
    }
}

fn iteration_step(chain: Chain<Value>, iteration: IterationConfig, default_delay: u64, parallel: bool) -> Chain<Value> {
    match iteration.collection.clone() {
        Some(Value::Array(items)) => {
            let worker = item_worker::<usize>(&iteration, default_delay);
            let chain = if parallel {
                chain.each_parallel_in::<_, Value, _>(items, worker)
            } else {
                chain.each_in::<_, Value, _>(items, worker)
            };
            chain.chain(|results: Vec<Value>, next: Next<Value>| next.done(Value::Array(results)))
        }
        Some(Value::Object(map)) => {
            let map: IndexMap<String, Value> = map.into_iter().collect();
            let worker = item_worker::<String>(&iteration, default_delay);
            let chain = if parallel {
                chain.each_parallel_in::<_, Value, _>(map, worker)
            } else {
                chain.each_in::<_, Value, _>(map, worker)
            };
            chain.chain(|results: IndexMap<String, Value>, next: Next<Value>| {
                next.done(Value::Object(results.into_iter().collect()))
            })
        }
        Some(other) => chain.chain(move |_: Value, next: Next<Value>| next.fail(not_a_collection(&other))),
        None => chain.chain(move |value: Value, next: Next<Value>| {
            iterate_forwarded(value, &iteration, default_delay, parallel, next)
        }),
    }
}

/// Iterate a forwarded JSON value through a fresh nested chain
fn iterate_forwarded(value: Value, iteration: &IterationConfig, default_delay: u64, parallel: bool, next: Next<Value>) {
    match value {
        Value::Array(items) => {
            let worker = item_worker::<usize>(iteration, default_delay);
            let nested = if parallel {
                Chain::each_parallel_of::<_, Value, _>(items, worker)
            } else {
                Chain::each_of::<_, Value, _>(items, worker)
            };
            nested.end(move |result| next.complete(result.map(Value::Array)));
        }
        Value::Object(map) => {
            let map: IndexMap<String, Value> = map.into_iter().collect();
            let worker = item_worker::<String>(iteration, default_delay);
            let nested = if parallel {
                Chain::each_parallel_of::<_, Value, _>(map, worker)
            } else {
                Chain::each_of::<_, Value, _>(map, worker)
            };
            nested.end(move |result| {
                next.complete(result.map(|results| Value::Object(results.into_iter().collect())))
            });
        }
        other => next.fail(not_a_collection(&other)),
    }
}

fn parallel_step(chain: Chain<Value>, tasks: TaskSet, default_delay: u64) -> Chain<Value> {
    match tasks {
        TaskSet::List(list) => {
            let tasks: Vec<Task<Value, Value>> = list
                .into_iter()
                .map(|config| config.into_task(default_delay))
                .collect();
            chain
                .parallel::<_, Value>(tasks)
                .chain(|results: Vec<Value>, next: Next<Value>| next.done(Value::Array(results)))
        }
        TaskSet::Named(named) => {
            let tasks: IndexMap<String, Task<Value, Value>> = named
                .into_iter()
                .map(|(name, config)| (name, config.into_task(default_delay)))
                .collect();
            chain
                .parallel::<_, Value>(tasks)
                .chain(|results: IndexMap<String, Value>, next: Next<Value>| {
                    next.done(Value::Object(results.into_iter().collect()))
                })
        }
    }
}

/// Build the per-item worker shared by every iteration step
fn item_worker<K>(iteration: &IterationConfig, default_delay: u64) -> impl Fn(K, Value, Next<Value>) + Send + Sync + 'static
where
    K: fmt::Display + 'static,
{
    let template = iteration.template.clone();
    let fail_on = iteration.fail_on.clone();
    let delay = Duration::from_millis(iteration.delay_ms.unwrap_or(default_delay));

    move |key: K, value: Value, next: Next<Value>| {
        let rendered = render(&template, &key.to_string(), &value);
        let outcome = if fail_on.as_deref() == Some(rendered.as_str()) {
            Err(ChainError::step(format!("item {} failed: {}", key, rendered)))
        } else {
            Ok(Value::String(rendered))
        };
        scheduler::after(delay, move || next.complete(outcome));
    }
}

/// Substitute `{key}` and `{value}`; strings render without quotes
fn render(template: &str, key: &str, value: &Value) -> String {
    let value = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    template.replace("{key}", key).replace("{value}", &value)
}

fn not_a_collection(value: &Value) -> ChainError {
    ChainError::step(format!("expected an array or object, found {}", kind_of(value)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
