use proptest::prelude::*;
use recognisers_automaton::{Dfa, Nfa, Pda, Recognisable, State};
use std::collections::BTreeSet;

const LETTERS: [&str; 3] = ["a", "b", "c"];

fn nfa(count: usize, edges: &[(usize, usize, usize)], terminal: &[bool]) -> Nfa {
    let mut nfa = Nfa::new();
    for i in 0..count {
        nfa.add_state(format!("s{}", i), terminal[i % terminal.len()]).unwrap();
    }
    for l in &LETTERS {
        nfa.add_letter(*l).unwrap();
    }
    for &(from, to, letter) in edges {
        nfa.add_transition(
            format!("s{}", from % count),
            format!("s{}", to % count),
            LETTERS[letter % LETTERS.len()],
        )
        .unwrap();
    }
    nfa.set_start_state("s0").unwrap();
    nfa
}

fn singleton(state: State) -> BTreeSet<State> {
    Some(state).into_iter().collect()
}

fn balanced(text: &str) -> bool {
    let mut open = Vec::new();
    for c in text.chars() {
        match c {
            '(' => open.push(')'),
            '[' => open.push(']'),
            '{' => open.push('}'),
            _ => {
                if open.pop() != Some(c) {
                    return false;
                }
            }
        }
    }
    open.is_empty()
}

proptest! {
    #[test]
    fn nfa_steps_are_unions(
        count in 1usize..6,
        edges in prop::collection::vec((0usize..6, 0usize..6, 0usize..3), 0..20),
        p in 0usize..6,
        q in 0usize..6,
        x in 0usize..3,
    ) {
        let nfa = nfa(count, &edges, &[false]);
        let automaton = nfa.definition();
        let p = nfa.state(format!("s{}", p % count)).unwrap();
        let q = nfa.state(format!("s{}", q % count)).unwrap();
        let both: BTreeSet<State> = vec![p, q].into_iter().collect();

        let joint = automaton.next_states(&both, LETTERS[x]).unwrap();
        let mut separate = automaton.next_states(&singleton(p), LETTERS[x]).unwrap();
        separate.extend(automaton.next_states(&singleton(q), LETTERS[x]).unwrap());
        prop_assert_eq!(joint, separate);
    }

    #[test]
    fn nfa_dead_ends_are_permanent(
        count in 1usize..6,
        edges in prop::collection::vec((0usize..6, 0usize..6, 0usize..3), 0..12),
        word in "[abc]{0,16}",
    ) {
        let mut nfa = nfa(count, &edges, &[false, true]);
        nfa.reset_current();
        let mut dead = false;
        for c in word.chars() {
            let active = nfa.step(c).unwrap();
            if dead {
                prop_assert!(active.is_empty());
            }
            dead = active.is_empty();
        }
        prop_assert_eq!(nfa.accepts(&word), nfa.is_in_terminal());
    }

    #[test]
    fn dfa_transitions_are_overwritten(t1 in 0usize..4, t2 in 0usize..4) {
        let mut dfa = Dfa::with_states(4);
        dfa.add_letter("a").unwrap();
        dfa.set_transition("s0", format!("s{}", t1), "a").unwrap();
        dfa.set_transition("s0", format!("s{}", t2), "a").unwrap();
        dfa.set_start_state("s0").unwrap();

        prop_assert_eq!(dfa.step('a'), dfa.state(format!("s{}", t2)).ok());
        prop_assert_eq!(dfa.definition().transitions().len(), 1);
    }

    #[test]
    fn empty_input_is_accepted_iff_the_start_is_terminal(terminal in any::<bool>()) {
        let mut dfa = Dfa::new();
        dfa.add_state("s0", terminal).unwrap();
        dfa.set_start_state("s0").unwrap();
        dfa.reset_current();
        prop_assert_eq!(dfa.accepts(""), terminal);
        prop_assert_eq!(dfa.is_in_terminal(), terminal);

        let mut nfa = Nfa::new();
        nfa.add_state("s0", terminal).unwrap();
        nfa.set_start_state("s0").unwrap();
        nfa.reset_current();
        prop_assert_eq!(nfa.accepts(""), terminal);
        prop_assert_eq!(nfa.is_in_terminal(), terminal);

        let mut pda = Pda::new();
        pda.add_state("s0", terminal).unwrap();
        pda.set_start_state("s0").unwrap();
        pda.reset_current();
        prop_assert_eq!(pda.accepts(""), terminal);
        prop_assert_eq!(pda.is_in_terminal(), terminal);
    }

    #[test]
    fn pda_accepts_balanced_brackets(text in "[()\\[\\]{}]{0,12}") {
        let mut pda = Pda::with_states(1);
        for c in "()[]{}".chars() {
            pda.add_letter(c.to_string()).unwrap();
            pda.set_transition("s0", "s0", c).unwrap();
        }
        pda.set_start_state("s0").unwrap();
        pda.set_end_state("s0").unwrap();

        prop_assert_eq!(pda.accepts(&text), balanced(&text));
    }
}
