use super::*;

#[test]
fn runs_sum_one_to_nine_to_completion() {
    let source = "
        .text
        lui $t0, 0
        ori $t0, $t0, 0
        lui $t1, 0
        ori $t1, $t1, 1
        lui $t2, 0
        ori $t2, $t2, 10
        L: add $t0, $t0, $t1
        addi $t1, $t1, 1
        bne $t1, $t2, L
        syscall
    ";

    let outcome = run(source, Config::default(), 1000).unwrap();

    assert_eq!(outcome.reason, StopReason::Exception(mips32::processor::SYSCALL));
    assert_eq!(outcome.registers[8], 45);
}

#[test]
fn stops_with_step_limit_reached_when_program_never_halts() {
    let source = "
        .text
        L: nop
        j L
    ";

    let outcome = run(source, Config::default(), 10).unwrap();

    assert_eq!(outcome.reason, StopReason::StepLimitReached);
}

#[test]
fn assembly_error_propagates_as_vex_error() {
    let source = ".text\nli $t0, 5\n";

    let err = run(source, Config::default(), 10).unwrap_err();

    assert!(matches!(err, Error::Assemble(_)));
}
