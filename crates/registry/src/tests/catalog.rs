use pretty_assertions::assert_eq;

use crate::action::{Action, ActionDecl};
use crate::feature::{Feature, FeatureRef};
use crate::proxy::ActionExt;
use crate::registry::FeatureRegistry;

#[derive(Default)]
struct IssueInvoiceAction;

impl Action for IssueInvoiceAction {
	fn allows_guests(&self) -> bool {
		true
	}
}

#[derive(Default)]
struct BillingFeature;

impl Feature for BillingFeature {
	fn actions(&self) -> Vec<ActionDecl> {
		vec![ActionDecl::of::<IssueInvoiceAction>()]
	}
}

#[derive(Default)]
struct RefundOrderAction;

impl Action for RefundOrderAction {
	fn allows_guests(&self) -> bool {
		true
	}
}

#[derive(Default)]
struct RefundsFeature;

impl Feature for RefundsFeature {
	fn actions(&self) -> Vec<ActionDecl> {
		vec![ActionDecl::of::<RefundOrderAction>()]
	}
}

#[derive(Default)]
struct CommerceFeatures;

impl Feature for CommerceFeatures {
	// The child is referenced by catalog name, not by value.
	fn features(&self) -> Vec<FeatureRef> {
		vec!["warden-tests/refunds".into()]
	}
}

crate::submit_feature!("warden-tests/billing" => BillingFeature);
crate::submit_feature!("warden-tests/refunds" => RefundsFeature);

#[test]
fn roots_can_be_registered_by_catalog_name() {
	let registry = FeatureRegistry::builder().build();
	registry.register("warden-tests/billing").unwrap();

	let mut proxy = IssueInvoiceAction.proxy(&registry).unwrap();
	assert!(proxy.available(None));
}

#[test]
fn unknown_catalog_names_are_rejected() {
	let registry = FeatureRegistry::builder().build();
	let error = registry.register("warden-tests/unknown").unwrap_err();
	assert_eq!(error.code(), 100);
}

#[test]
fn children_can_be_referenced_by_catalog_name() {
	let registry = FeatureRegistry::builder().build();
	registry.register(CommerceFeatures).unwrap();

	let chain = registry.features_for_action(&RefundOrderAction).unwrap();
	let ids: Vec<&str> = chain.iter().map(|feature| feature.id.as_str()).collect();
	assert_eq!(ids, ["commerce", "refunds"]);
}

#[test]
fn a_broken_child_reference_rolls_the_registration_back() {
	#[derive(Default)]
	struct TypoFeatures;

	impl Feature for TypoFeatures {
		fn features(&self) -> Vec<FeatureRef> {
			vec![BillingFeature.into(), "warden-tests/speling-mistake".into()]
		}
	}

	let registry = FeatureRegistry::builder().build();
	let error = registry.register(TypoFeatures).unwrap_err();
	assert_eq!(error.code(), 100);

	// The billing child that registered before the bad reference is gone.
	assert!(registry.features_for_action(&IssueInvoiceAction).is_err());
}
