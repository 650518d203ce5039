pub mod common;

#[cfg(test)]
mod test_phase_queue;

#[cfg(test)]
mod test_abilities;

#[cfg(test)]
mod test_modifiers;

#[cfg(test)]
mod test_battle_flow;
