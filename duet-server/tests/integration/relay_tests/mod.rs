mod test_relay_preserves_order;
