mod test_candidate_durability;
