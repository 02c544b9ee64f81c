//! Typed rendering context.
//!
//! A [`TemplateContext`] is the validated configuration plus the variables a
//! sub-generator adds (class names, entity fields, ...). It is turned into the
//! template scope by [`TemplateContext::to_value`]: configuration fields at top
//! level, the whole model under `config`, the conditional helpers, then the
//! caller variables (which win on a name clash).

use std::collections::BTreeMap;
use std::sync::Arc;

use minijinja::value::{Rest, Value};
use sfs_config::{BuildTool, ConfigModel, Database, Feature, FrontendFramework};

use crate::condition::{
    evaluate_condition, has_auth, has_feature, is_build_tool, is_database, is_frontend,
    RenderCondition,
};

/// Context for rendering templates of one generation run.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    config: Arc<ConfigModel>,
    vars: BTreeMap<String, serde_json::Value>,
}

impl TemplateContext {
    pub fn new(config: impl Into<Arc<ConfigModel>>) -> Self {
        Self {
            config: config.into(),
            vars: BTreeMap::new(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn with_vars(mut self, vars: BTreeMap<String, serde_json::Value>) -> Self {
        self.vars.extend(vars);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn config(&self) -> &ConfigModel {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<ConfigModel> {
        Arc::clone(&self.config)
    }

    pub fn vars(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.vars
    }

    /// Look a name up the way templates see it: caller variables first, then
    /// configuration fields.
    pub fn lookup(&self, name: &str) -> Option<serde_json::Value> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        match serde_json::to_value(self.config.as_ref()) {
            Ok(serde_json::Value::Object(mut fields)) => fields.remove(name),
            _ => None,
        }
    }

    /// Build the template scope.
    pub fn to_value(&self) -> Value {
        let mut scope: BTreeMap<String, Value> = BTreeMap::new();

        if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(self.config.as_ref()) {
            for (key, value) in fields {
                scope.insert(key, Value::from_serialize(&value));
            }
        }
        scope.insert("config".to_string(), Value::from_serialize(self.config.as_ref()));
        add_conditional_helpers(&mut scope, &self.config);

        for (key, value) in &self.vars {
            scope.insert(key.clone(), Value::from_serialize(value));
        }
        Value::from(scope)
    }
}

/// Positional arguments and the trailing keyword-argument map, if any.
fn split_kwargs(args: &[Value]) -> (&[Value], Option<&Value>) {
    match args.split_last() {
        Some((last, positional)) if last.is_kwargs() => (positional, Some(last)),
        _ => (args, None),
    }
}

/// Branch picked by a conditional helper, positionally or from the `then` /
/// `else` keyword arguments. A missing branch renders as "".
fn branch(args: &[Value], then_index: usize, selected: bool) -> Value {
    let (positional, kwargs) = split_kwargs(args);
    let (index, keyword) = if selected {
        (then_index, "then")
    } else {
        (then_index + 1, "else")
    };
    positional
        .get(index)
        .cloned()
        .or_else(|| {
            kwargs
                .and_then(|kwargs| kwargs.get_attr(keyword).ok())
                .filter(|value| !value.is_undefined() && !value.is_none())
        })
        .unwrap_or_else(|| Value::from(""))
}

/// First positional argument of a helper call.
fn selector(args: &[Value]) -> Option<&Value> {
    split_kwargs(args).0.first()
}

/// Evaluate a condition built from the helper's selector argument. A selector
/// that is not a recognised label makes the predicate false.
fn select_with<T>(
    config: &ConfigModel,
    selector: Option<&Value>,
    parse: fn(&str) -> Option<T>,
    condition: fn(T) -> RenderCondition,
) -> bool {
    selector
        .and_then(Value::as_str)
        .and_then(parse)
        .map(|parsed| evaluate_condition(&condition(parsed), config))
        .unwrap_or(false)
}

/// Add the `if_*` helpers, `if_condition` and `config_value` to a scope.
///
/// Helpers never fail: wrong argument types or unknown labels take the
/// "else" branch.
pub fn add_conditional_helpers(scope: &mut BTreeMap<String, Value>, config: &Arc<ConfigModel>) {
    let cfg = Arc::clone(config);
    scope.insert(
        "if_frontend".to_string(),
        Value::from_function(move |args: Rest<Value>| {
            let selected = select_with(&cfg, selector(&args), FrontendFramework::parse, is_frontend);
            branch(&args, 1, selected)
        }),
    );

    let cfg = Arc::clone(config);
    scope.insert(
        "if_database".to_string(),
        Value::from_function(move |args: Rest<Value>| {
            let selected = select_with(&cfg, selector(&args), Database::parse, is_database);
            branch(&args, 1, selected)
        }),
    );

    let cfg = Arc::clone(config);
    scope.insert(
        "if_build_tool".to_string(),
        Value::from_function(move |args: Rest<Value>| {
            let selected = select_with(&cfg, selector(&args), BuildTool::parse, is_build_tool);
            branch(&args, 1, selected)
        }),
    );

    let cfg = Arc::clone(config);
    scope.insert(
        "if_has_feature".to_string(),
        Value::from_function(move |args: Rest<Value>| {
            let selected = select_with(&cfg, selector(&args), Feature::parse, has_feature);
            branch(&args, 1, selected)
        }),
    );

    let cfg = Arc::clone(config);
    scope.insert(
        "if_has_auth".to_string(),
        Value::from_function(move |args: Rest<Value>| {
            branch(&args, 0, evaluate_condition(&has_auth(), &cfg))
        }),
    );

    scope.insert(
        "if_condition".to_string(),
        Value::from_function(|args: Rest<Value>| {
            let selected = selector(&args).is_some_and(Value::is_true);
            branch(&args, 1, selected)
        }),
    );

    let tree = serde_json::to_value(config.as_ref()).unwrap_or_default();
    scope.insert(
        "config_value".to_string(),
        Value::from_function(move |args: Rest<Value>| {
            let (positional, _) = split_kwargs(&args);
            let fallback = positional.get(1).cloned().unwrap_or_else(|| Value::from(""));
            let Some(path) = positional.first().and_then(Value::as_str) else {
                return fallback;
            };
            path.split('.')
                .try_fold(&tree, |node, part| node.get(part))
                .filter(|found| !found.is_null())
                .map(Value::from_serialize)
                .unwrap_or(fallback)
        }),
    );
}
