//! Round parameters per game type. Every table changes at tiers 3, 5, 7 and 9.

use super::resolver::DifficultyTable;
use super::types::OptionValue::{Count, Probability, Seconds, Toggle};
use super::types::{GameType, TIME_LIMIT};

pub fn port_table() -> DifficultyTable {
    DifficultyTable::new(
        GameType::Port,
        &[
            (TIME_LIMIT, Seconds(60)),
            ("port_count", Count(5)),
            ("obscure_port_probability", Probability(0.0)),
            ("allow_text_input", Toggle(false)),
        ],
    )
    .threshold(
        3,
        &[
            (TIME_LIMIT, Seconds(50)),
            ("port_count", Count(6)),
            ("obscure_port_probability", Probability(0.1)),
        ],
    )
    .threshold(
        5,
        &[
            (TIME_LIMIT, Seconds(45)),
            ("port_count", Count(8)),
            ("obscure_port_probability", Probability(0.2)),
            ("allow_text_input", Toggle(true)),
        ],
    )
    .threshold(
        7,
        &[
            (TIME_LIMIT, Seconds(40)),
            ("port_count", Count(10)),
            ("obscure_port_probability", Probability(0.35)),
        ],
    )
    .threshold(
        9,
        &[
            (TIME_LIMIT, Seconds(30)),
            ("port_count", Count(12)),
            ("obscure_port_probability", Probability(0.5)),
        ],
    )
}

pub fn protocol_table() -> DifficultyTable {
    DifficultyTable::new(
        GameType::Protocol,
        &[
            (TIME_LIMIT, Seconds(90)),
            ("question_count", Count(5)),
            ("obscure_protocol_probability", Probability(0.0)),
            ("layer_question_probability", Probability(0.0)),
            ("hide_port_hints", Toggle(false)),
        ],
    )
    .threshold(
        3,
        &[
            (TIME_LIMIT, Seconds(80)),
            ("question_count", Count(6)),
            ("obscure_protocol_probability", Probability(0.1)),
            ("layer_question_probability", Probability(0.2)),
        ],
    )
    .threshold(
        5,
        &[
            (TIME_LIMIT, Seconds(70)),
            ("question_count", Count(8)),
            ("obscure_protocol_probability", Probability(0.25)),
            ("layer_question_probability", Probability(0.3)),
        ],
    )
    .threshold(
        7,
        &[
            (TIME_LIMIT, Seconds(60)),
            ("question_count", Count(10)),
            ("obscure_protocol_probability", Probability(0.4)),
            ("layer_question_probability", Probability(0.4)),
            ("hide_port_hints", Toggle(true)),
        ],
    )
    .threshold(
        9,
        &[
            (TIME_LIMIT, Seconds(45)),
            ("question_count", Count(12)),
            ("obscure_protocol_probability", Probability(0.5)),
            ("layer_question_probability", Probability(0.5)),
        ],
    )
}

pub fn subnetting_table() -> DifficultyTable {
    DifficultyTable::new(
        GameType::Subnetting,
        &[
            (TIME_LIMIT, Seconds(180)),
            ("question_count", Count(3)),
            ("vlsm_probability", Probability(0.0)),
            ("ipv6_probability", Probability(0.0)),
            ("allow_free_text", Toggle(false)),
        ],
    )
    .threshold(
        3,
        &[
            (TIME_LIMIT, Seconds(150)),
            ("question_count", Count(4)),
            ("vlsm_probability", Probability(0.1)),
        ],
    )
    .threshold(
        5,
        &[
            (TIME_LIMIT, Seconds(120)),
            ("question_count", Count(5)),
            ("vlsm_probability", Probability(0.25)),
            ("ipv6_probability", Probability(0.1)),
        ],
    )
    .threshold(
        7,
        &[
            (TIME_LIMIT, Seconds(100)),
            ("question_count", Count(6)),
            ("vlsm_probability", Probability(0.4)),
            ("ipv6_probability", Probability(0.2)),
            ("allow_free_text", Toggle(true)),
        ],
    )
    .threshold(
        9,
        &[
            (TIME_LIMIT, Seconds(75)),
            ("question_count", Count(8)),
            ("vlsm_probability", Probability(0.6)),
            ("ipv6_probability", Probability(0.35)),
        ],
    )
}

pub fn acronym_table() -> DifficultyTable {
    DifficultyTable::new(
        GameType::Acronym,
        &[
            (TIME_LIMIT, Seconds(60)),
            ("acronym_count", Count(5)),
            ("obscure_acronym_probability", Probability(0.0)),
            ("reverse_mode_probability", Probability(0.0)),
            ("allow_free_text", Toggle(false)),
        ],
    )
    .threshold(
        3,
        &[
            (TIME_LIMIT, Seconds(55)),
            ("acronym_count", Count(6)),
            ("obscure_acronym_probability", Probability(0.1)),
            ("reverse_mode_probability", Probability(0.1)),
        ],
    )
    .threshold(
        5,
        &[
            (TIME_LIMIT, Seconds(45)),
            ("acronym_count", Count(8)),
            ("obscure_acronym_probability", Probability(0.2)),
            ("reverse_mode_probability", Probability(0.2)),
            ("allow_free_text", Toggle(true)),
        ],
    )
    .threshold(
        7,
        &[
            (TIME_LIMIT, Seconds(40)),
            ("acronym_count", Count(10)),
            ("obscure_acronym_probability", Probability(0.35)),
            ("reverse_mode_probability", Probability(0.3)),
        ],
    )
    .threshold(
        9,
        &[
            (TIME_LIMIT, Seconds(30)),
            ("acronym_count", Count(12)),
            ("obscure_acronym_probability", Probability(0.5)),
            ("reverse_mode_probability", Probability(0.4)),
        ],
    )
}

pub fn standard_tables() -> Vec<DifficultyTable> {
    vec![port_table(), protocol_table(), subnetting_table(), acronym_table()]
}
