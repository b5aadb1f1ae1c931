use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

use crate::action::{Action, ActionDecl};
use crate::availability::AvailabilityBuilder;
use crate::constraints::ConstraintsBuilder;
use crate::feature::{Feature, FeatureRef};
use crate::proxy::ActionExt;
use crate::registry::FeatureRegistry;
use warden_primitives::WardenError;

#[derive(Default)]
struct SearchDocumentsAction;

impl Action for SearchDocumentsAction {
	fn allows_guests(&self) -> bool {
		true
	}
}

static ARCHIVE_AVAILABILITY_RUNS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct ArchiveDocumentsAction;

impl Action for ArchiveDocumentsAction {
	fn allows_guests(&self) -> bool {
		true
	}

	fn availability<'a>(&'a self, builder: &mut AvailabilityBuilder<'a>) {
		ARCHIVE_AVAILABILITY_RUNS.fetch_add(1, Ordering::Relaxed);
		builder.assert_true(true);
	}
}

#[derive(Default)]
struct DocumentsFeature;

impl Feature for DocumentsFeature {
	fn description(&self) -> Option<String> {
		Some("document search and storage".into())
	}

	fn actions(&self) -> Vec<ActionDecl> {
		vec![ActionDecl::of::<SearchDocumentsAction>()]
	}

	fn constraints(&self, constraints: &mut ConstraintsBuilder) {
		// `ls` exists everywhere this suite runs.
		constraints.executable_installed("ls");
	}
}

#[derive(Default)]
struct WorkspaceFeatures;

impl Feature for WorkspaceFeatures {
	fn features(&self) -> Vec<FeatureRef> {
		vec![DocumentsFeature.into()]
	}
}

#[derive(Default)]
struct BrokenToolingFeature;

impl Feature for BrokenToolingFeature {
	fn actions(&self) -> Vec<ActionDecl> {
		vec![ActionDecl::of::<ArchiveDocumentsAction>()]
	}

	fn constraints(&self, constraints: &mut ConstraintsBuilder) {
		constraints.executable_installed("surely-not-a-real-binary-warden");
	}
}

#[derive(Default)]
struct EmptyFeature;

impl Feature for EmptyFeature {}

#[test]
fn an_empty_feature_cannot_be_registered() {
	let registry = FeatureRegistry::builder().build();
	let error = registry.register(EmptyFeature).unwrap_err();
	assert_eq!(error.code(), 103);
	assert!(matches!(error, WardenError::FeatureEmpty { .. }));
}

#[test]
fn a_failed_registration_leaves_prior_stack_content_untouched() {
	let registry = FeatureRegistry::builder().build();
	registry.register(DocumentsFeature).unwrap();

	let error = registry.register(EmptyFeature).unwrap_err();
	assert_eq!(error.code(), 103);

	// The earlier registration in the same stack survives.
	assert!(SearchDocumentsAction.proxy(&registry).is_ok());
}

#[test]
fn a_feature_can_declare_actions() {
	let registry = FeatureRegistry::builder().build();
	registry.register(DocumentsFeature).unwrap();

	let chain = registry
		.features_for_action(&SearchDocumentsAction)
		.unwrap();
	assert_eq!(chain.len(), 1);
	assert_eq!(chain[0].id, "documents");
	assert_eq!(
		chain[0].description.as_deref(),
		Some("document search and storage")
	);
	assert_eq!(chain[0].actions, ["search-documents"]);
}

#[test]
fn nested_features_record_the_ancestor_chain_root_to_owner() {
	let registry = FeatureRegistry::builder().build();
	registry.register(WorkspaceFeatures).unwrap();

	let chain = registry
		.features_for_action(&SearchDocumentsAction)
		.unwrap();
	let ids: Vec<&str> = chain.iter().map(|feature| feature.id.as_str()).collect();
	assert_eq!(ids, ["workspace", "documents"]);
	assert_eq!(chain[0].features, ["documents"]);
}

#[test]
fn unregistered_actions_have_no_features() {
	let registry = FeatureRegistry::builder().build();
	let error = registry
		.features_for_action(&SearchDocumentsAction)
		.unwrap_err();
	assert_eq!(error.code(), 200);
}

#[test]
fn a_failing_feature_constraint_denies_its_actions_without_availability_checks() {
	let registry = FeatureRegistry::builder().build();
	registry.register(BrokenToolingFeature).unwrap();

	ARCHIVE_AVAILABILITY_RUNS.store(0, Ordering::Relaxed);
	let mut proxy = ArchiveDocumentsAction.proxy(&registry).unwrap();
	assert!(!proxy.available(None));

	let decision = proxy.decision().unwrap();
	assert_eq!(
		decision.message(),
		Some("Feature \"broken-tooling\": system constraints not met")
	);
	// Short-circuit: the action's availability hook never ran.
	assert_eq!(ARCHIVE_AVAILABILITY_RUNS.load(Ordering::Relaxed), 0);
}

#[test]
fn a_passing_feature_constraint_does_not_block_its_actions() {
	let registry = FeatureRegistry::builder().build();
	registry.register(DocumentsFeature).unwrap();

	let mut proxy = SearchDocumentsAction.proxy(&registry).unwrap();
	assert!(proxy.available(None));
}

#[test]
fn reregistering_a_root_is_rejected() {
	let registry = FeatureRegistry::builder().build();
	registry.register(DocumentsFeature).unwrap();

	let error = registry.register(DocumentsFeature).unwrap_err();
	assert_eq!(error.code(), 1);
	assert!(matches!(error, WardenError::AlreadySetup { .. }));
}

#[test]
fn duplicate_feature_ids_in_one_stack_are_rejected() {
	#[derive(Default)]
	struct AliasedDocumentsFeature;

	impl Feature for AliasedDocumentsFeature {
		fn id(&self) -> String {
			"documents".into()
		}

		fn actions(&self) -> Vec<ActionDecl> {
			vec![ActionDecl::of::<ArchiveDocumentsAction>()]
		}
	}

	#[derive(Default)]
	struct ToolingFeatures;

	impl Feature for ToolingFeatures {
		fn features(&self) -> Vec<FeatureRef> {
			vec![AliasedDocumentsFeature.into()]
		}
	}

	let registry = FeatureRegistry::builder().build();
	registry.register(DocumentsFeature).unwrap();

	let error = registry.register(ToolingFeatures).unwrap_err();
	assert_eq!(error.code(), 101);
	assert!(matches!(error, WardenError::FeatureAlreadyDeclared { .. }));
}

#[test]
fn a_mid_registration_failure_rolls_the_whole_stack_back() {
	#[derive(Default)]
	struct CollidingFeature;

	impl Feature for CollidingFeature {
		// Same action id as DocumentsFeature's declaration.
		fn actions(&self) -> Vec<ActionDecl> {
			vec![ActionDecl::of::<SearchDocumentsAction>()]
		}
	}

	#[derive(Default)]
	struct SuiteFeatures;

	impl Feature for SuiteFeatures {
		fn features(&self) -> Vec<FeatureRef> {
			vec![DocumentsFeature.into(), CollidingFeature.into()]
		}
	}

	let registry = FeatureRegistry::builder().build();
	let error = registry.register(SuiteFeatures).unwrap_err();
	assert_eq!(error.code(), 201);

	// All-or-nothing: the successfully indexed first child is gone too.
	let error = registry
		.features_for_action(&SearchDocumentsAction)
		.unwrap_err();
	assert_eq!(error.code(), 200);
}

#[test]
fn reset_clears_a_single_stack() {
	let registry = FeatureRegistry::builder().build();
	registry.register(DocumentsFeature).unwrap();

	registry.reset(Some("default"));
	assert!(registry.features_for_action(&SearchDocumentsAction).is_err());

	// The stack is reusable after a reset.
	registry.register(DocumentsFeature).unwrap();
	assert!(registry.features_for_action(&SearchDocumentsAction).is_ok());
}
