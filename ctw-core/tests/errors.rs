use ctw_core::{
    GenerationError, GenerationErrorCode, GeneratorBuilder, Overrides, RejectionReason,
    RejectionReasonCode, ValidationErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(
    RejectionReason::SingleHousingOverflow { insertion_jobs: 97 },
    RejectionReasonCode::SingleHousingOverflow,
)]
#[case(
    RejectionReason::CentralPlugOverflow { central_load: 96 },
    RejectionReasonCode::CentralPlugOverflow,
)]
#[case(
    RejectionReason::NormalCavityOverflow { needed: 270 },
    RejectionReasonCode::NormalCavityOverflow,
)]
#[case(
    RejectionReason::SideCablesExceedTwoSided { side_cables: 4, two_sided_cables: 1 },
    RejectionReasonCode::SideCablesExceedTwoSided,
)]
#[case(
    RejectionReason::InsertionJobsExceedLimit { insertion_jobs: 200 },
    RejectionReasonCode::InsertionJobsExceedLimit,
)]
#[case(RejectionReason::NoInsertionJobs, RejectionReasonCode::NoInsertionJobs)]
#[case(
    RejectionReason::RuleTableExhausted { table: "housings" },
    RejectionReasonCode::RuleTableExhausted,
)]
fn returns_expected_rejection_code(
    #[case] reason: RejectionReason,
    #[case] expected: RejectionReasonCode,
) {
    assert_eq!(reason.code(), expected);
    assert_eq!(reason.code().as_str(), expected.as_str());
}

#[rstest]
#[case(
    GenerationError::InvalidRecordCount { got: 0 },
    GenerationErrorCode::InvalidRecordCount,
    None,
)]
#[case(GenerationError::InvalidMaxAttempts, GenerationErrorCode::InvalidMaxAttempts, None)]
#[case(
    GenerationError::InvalidModel { model: "housings", reason: "bad".to_owned() },
    GenerationErrorCode::InvalidModel,
    None,
)]
#[case(
    GenerationError::Rejected { record: 3, reason: RejectionReason::NoInsertionJobs },
    GenerationErrorCode::Rejected,
    Some(RejectionReasonCode::NoInsertionJobs),
)]
#[case(
    GenerationError::AttemptsExhausted {
        record: 1,
        attempts: 5,
        last: RejectionReason::CentralPlugOverflow { central_load: 99 },
    },
    GenerationErrorCode::AttemptsExhausted,
    Some(RejectionReasonCode::CentralPlugOverflow),
)]
fn returns_expected_generation_code(
    #[case] error: GenerationError,
    #[case] expected: GenerationErrorCode,
    #[case] rejection: Option<RejectionReasonCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
    assert_eq!(error.rejection_code(), rejection);
}

#[test]
fn validation_error_lists_every_violation() {
    let err = GeneratorBuilder::new()
        .with_overrides(Overrides {
            insertion_jobs: Some(0),
            two_sided_cables: Some(101),
            one_sided_cables: Some(-1),
            side_cables: Some(66),
        })
        .build()
        .expect_err("every override is out of range");
    assert_eq!(err.code(), GenerationErrorCode::Validation);
    let GenerationError::Validation { source } = &err else {
        panic!("expected a validation error, got {err:?}");
    };
    for code in [
        ValidationErrorCode::InsertionJobsOutOfRange,
        ValidationErrorCode::TwoSidedCablesOutOfRange,
        ValidationErrorCode::OneSidedCablesOutOfRange,
        ValidationErrorCode::SideCablesOutOfRange,
    ] {
        assert!(source.contains(code), "missing {code}");
    }
    assert!(err.to_string().starts_with("invalid overrides: "));
}
