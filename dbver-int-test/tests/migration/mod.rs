mod named_format_test;
