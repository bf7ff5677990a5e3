use crate::catalog::CatalogIndex;
use crate::codec::{build_action_state, reconcile, ActionField};
use crate::config::CompilerConfig;
use crate::error::{ImportError, Result, RuleForgeError};
use crate::form::{self, FormState};
use crate::portable::{self, PortableDoc};
use crate::rule::{Rule, RuleAction};
use crate::validation;

/// 绑定目录的入口，汇集所有编译操作
#[derive(Clone, Debug, Default)]
pub struct RuleCompiler {
    catalog: CatalogIndex,
    config: CompilerConfig,
}

impl RuleCompiler {
    pub fn new(catalog: CatalogIndex, config: CompilerConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn build_form(&self, rule: Option<&Rule>) -> FormState {
        form::build_form(rule, &self.catalog, &self.config)
    }

    /// `action_type` 的默认可编辑动作（目录中存在时）
    pub fn new_action(&self, action_type: &str) -> Option<ActionField> {
        self.catalog.action(action_type).map(build_action_state)
    }

    pub fn reconcile(&self, action: &RuleAction) -> ActionField {
        reconcile(action, &self.catalog)
    }

    pub fn validate(&self, form: &FormState) -> Vec<String> {
        validation::validate(form, &self.catalog)
    }

    /// 先校验再编译，问题以 [`RuleForgeError::Invalid`] 返回
    #[tracing::instrument(skip_all, fields(rule = %form.name))]
    pub fn compile(&self, form: &FormState) -> Result<Rule> {
        let issues = self.validate(form);
        if !issues.is_empty() {
            tracing::debug!(issues = issues.len(), "form rejected");
            return Err(RuleForgeError::Invalid(issues));
        }
        Ok(form::compile(form, &self.catalog))
    }

    pub fn export(&self, rule: &Rule) -> PortableDoc {
        portable::serialize(rule)
    }

    pub fn import(&self, raw: &str) -> std::result::Result<Rule, ImportError> {
        portable::deserialize_str(raw)
    }
}
