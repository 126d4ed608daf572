mod ticket_tests;
